use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifier of a card inside one card-pairs game (0..N-1 in creation order).
pub type CardId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameType {
    Sequence,
    #[serde(alias = "cards")]
    Pairs,
    Numbers,
    PairSequence,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Sequence => "sequence",
            GameType::Pairs => "pairs",
            GameType::Numbers => "numbers",
            GameType::PairSequence => "pair-sequence",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of items the player has to remember
    pub fn sequence_length(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 6,
            Difficulty::Hard => 8,
        }
    }

    /// Upper bound (inclusive) of generated values; the lower bound is always 1
    pub fn number_range(&self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 7,
            Difficulty::Hard => 9,
        }
    }

    /// How long the challenge is shown before the player has to answer
    pub fn memorization_time(&self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(5000),
            Difficulty::Medium => Duration::from_millis(3000),
            Difficulty::Hard => Duration::from_millis(2000),
        }
    }

    /// Total cards dealt in a card-pairs game
    pub fn card_count(&self) -> usize {
        match self {
            Difficulty::Easy => 8,
            Difficulty::Medium => 12,
            Difficulty::Hard => 16,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// Shared with exactly one other card in the same game
    pub value: u32,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    pub fn new(id: CardId, value: u32) -> Self {
        Self {
            id,
            value,
            flipped: false,
            matched: false,
        }
    }

    pub fn is_hidden(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// Verdict for a submitted answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub success: bool,
    pub score: u32,
    pub message: String,
}

impl GameResult {
    pub fn win(score: u32, message: impl Into<String>) -> Self {
        Self {
            success: true,
            score,
            message: message.into(),
        }
    }

    pub fn loss(message: impl Into<String>) -> Self {
        Self {
            success: false,
            score: 0,
            message: message.into(),
        }
    }
}
