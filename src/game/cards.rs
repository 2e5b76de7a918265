use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use thiserror::Error;

use crate::{
    game::Scorer,
    models::{Card, CardId, Difficulty, GameResult},
};

/// A flip or pair check that would break the card rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("card {0} does not exist")]
    UnknownCard(CardId),
    #[error("card {0} is already face up")]
    AlreadyRevealed(CardId),
    #[error("two cards are already flipped")]
    TooManyFlipped,
    #[error("a card cannot be paired with itself")]
    SameCard,
    #[error("card {0} is already matched")]
    AlreadyMatched(CardId),
}

/// Classic concentration game.
///
/// Every card is hidden, flipped or matched. At most two cards can be flipped
/// and unresolved at once. A mismatch leaves both cards face up until
/// `reset_flipped_cards` is called, so the caller decides when the turn ends.
#[derive(Debug)]
pub struct CardPairsGame {
    difficulty: Difficulty,
    rng: StdRng,
    cards: Vec<Card>,
    flipped: Vec<CardId>,
    moves: u32,
    pairs_found: usize,
    total_pairs: usize,
}

impl CardPairsGame {
    const MAX_FLIPPED: usize = 2;

    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_os_rng())
    }

    pub fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        Self {
            difficulty,
            rng,
            cards: Vec::new(),
            flipped: Vec::with_capacity(Self::MAX_FLIPPED),
            moves: 0,
            pairs_found: 0,
            total_pairs: difficulty.card_count() / 2,
        }
    }

    /// Deal a fresh shuffled deck and reset all progress
    pub fn generate(&mut self) {
        let range = self.difficulty.number_range();

        self.cards.clear();
        self.flipped.clear();
        self.moves = 0;
        self.pairs_found = 0;

        // Different pairs may share a value, only the two cards of one pair
        // are guaranteed equal
        let mut next_id: CardId = 0;
        for _ in 0..self.total_pairs {
            let value = self.rng.random_range(1..=range);
            self.cards.push(Card::new(next_id, value));
            self.cards.push(Card::new(next_id + 1, value));
            next_id += 2;
        }

        self.cards.shuffle(&mut self.rng);
    }

    pub fn flip_card(&mut self, card_id: CardId) -> Result<(), CardError> {
        let index = self.index_of(card_id)?;
        let card = &self.cards[index];

        if card.matched {
            return Err(CardError::AlreadyMatched(card_id));
        }
        if card.flipped {
            return Err(CardError::AlreadyRevealed(card_id));
        }
        if self.flipped.len() >= Self::MAX_FLIPPED {
            return Err(CardError::TooManyFlipped);
        }

        self.cards[index].flipped = true;
        self.flipped.push(card_id);
        Ok(())
    }

    /// The currently flipped, unresolved cards in flip order
    pub fn flipped_cards(&self) -> (Option<CardId>, Option<CardId>) {
        (self.flipped.first().copied(), self.flipped.get(1).copied())
    }

    /// Compare two cards. Counts as a move once both ids resolve.
    ///
    /// On a match both cards become permanently matched. On a mismatch the
    /// flipped flags are left alone.
    pub fn check_pair(&mut self, first: CardId, second: CardId) -> Result<bool, CardError> {
        let a = self.index_of(first)?;
        let b = self.index_of(second)?;

        if a == b {
            return Err(CardError::SameCard);
        }
        if self.cards[a].matched {
            return Err(CardError::AlreadyMatched(first));
        }
        if self.cards[b].matched {
            return Err(CardError::AlreadyMatched(second));
        }

        self.moves += 1;

        if self.cards[a].value != self.cards[b].value {
            return Ok(false);
        }

        for index in [a, b] {
            self.cards[index].matched = true;
            self.cards[index].flipped = true;
        }
        self.flipped.retain(|id| *id != first && *id != second);
        self.pairs_found += 1;
        Ok(true)
    }

    /// Turn every unmatched card face down and clear the flip slots
    pub fn reset_flipped_cards(&mut self) {
        for card in self.cards.iter_mut().filter(|c| !c.matched) {
            card.flipped = false;
        }
        self.flipped.clear();
    }

    pub fn is_game_complete(&self) -> bool {
        self.pairs_found >= self.total_pairs
    }

    /// Final verdict. The submitted answer is irrelevant for card games.
    pub fn check_answer(&self, _answer: &[i64]) -> GameResult {
        if self.is_game_complete() {
            GameResult::win(
                Scorer::card_pairs(self.total_pairs, self.moves),
                "All pairs found!",
            )
        } else {
            GameResult::loss("The game is not finished yet")
        }
    }

    /// Card values in table order
    pub fn sequence(&self) -> Vec<u32> {
        self.cards.iter().map(|c| c.value).collect()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn pairs_found(&self) -> usize {
        self.pairs_found
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn card_count(&self) -> usize {
        self.difficulty.card_count()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn index_of(&self, card_id: CardId) -> Result<usize, CardError> {
        self.cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(CardError::UnknownCard(card_id))
    }
}
