// Game engine modules

pub mod cards;
pub mod scorer;
pub mod sequence;
pub mod validator;

use std::time::Duration;

pub use cards::{CardError, CardPairsGame};
pub use scorer::Scorer;
pub use sequence::{PairSequenceGame, SequenceGame};
pub use validator::AnswerValidator;

use crate::models::{Difficulty, GameResult, GameType};

/// One live game instance. The set of mechanics is closed, so dispatch is a
/// plain match instead of a trait object.
#[derive(Debug)]
pub enum Game {
    /// Sequence recall, also used for the "numbers" type
    Sequence {
        game_type: GameType,
        game: SequenceGame,
    },
    PairSequence(PairSequenceGame),
    Cards(CardPairsGame),
}

impl Game {
    /// Build the mechanic for `game_type` without generating a challenge
    pub fn new(game_type: GameType, difficulty: Difficulty) -> Self {
        match game_type {
            GameType::Sequence | GameType::Numbers => Game::Sequence {
                game_type,
                game: SequenceGame::new(difficulty),
            },
            GameType::PairSequence => Game::PairSequence(PairSequenceGame::new(difficulty)),
            GameType::Pairs => Game::Cards(CardPairsGame::new(difficulty)),
        }
    }

    pub fn generate(&mut self) {
        match self {
            Game::Sequence { game, .. } => game.generate(),
            Game::PairSequence(game) => game.generate(),
            Game::Cards(game) => game.generate(),
        }
    }

    pub fn check_answer(&self, answer: &[i64]) -> GameResult {
        match self {
            Game::Sequence { game, .. } => game.check_answer(answer),
            Game::PairSequence(game) => game.check_answer(answer),
            Game::Cards(game) => game.check_answer(answer),
        }
    }

    /// The values the player is asked to memorize, in display order
    pub fn sequence(&self) -> Vec<u32> {
        match self {
            Game::Sequence { game, .. } => game.sequence().to_vec(),
            Game::PairSequence(game) => game.sequence().to_vec(),
            Game::Cards(game) => game.sequence(),
        }
    }

    pub fn game_type(&self) -> GameType {
        match self {
            Game::Sequence { game_type, .. } => *game_type,
            Game::PairSequence(_) => GameType::PairSequence,
            Game::Cards(_) => GameType::Pairs,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            Game::Sequence { game, .. } => game.difficulty(),
            Game::PairSequence(game) => game.difficulty(),
            Game::Cards(game) => game.difficulty(),
        }
    }

    pub fn memorization_time(&self) -> Duration {
        self.difficulty().memorization_time()
    }

    pub fn as_cards(&self) -> Option<&CardPairsGame> {
        match self {
            Game::Cards(game) => Some(game),
            _ => None,
        }
    }

    pub fn as_cards_mut(&mut self) -> Option<&mut CardPairsGame> {
        match self {
            Game::Cards(game) => Some(game),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_reuses_sequence_mechanic() {
        let mut game = Game::new(GameType::Numbers, Difficulty::Hard);
        game.generate();
        assert_eq!(game.game_type(), GameType::Numbers);
        assert_eq!(game.sequence().len(), 8);
        assert!(matches!(game, Game::Sequence { .. }));
        assert!(game.as_cards().is_none());
    }

    #[test]
    fn test_pairs_type_deals_cards() {
        let mut game = Game::new(GameType::Pairs, Difficulty::Medium);
        game.generate();
        assert_eq!(game.game_type(), GameType::Pairs);
        assert_eq!(game.sequence().len(), 12);
        assert_eq!(game.as_cards().map(|c| c.total_pairs()), Some(6));
    }

    #[test]
    fn test_dispatch_check_answer() {
        let mut game = Game::new(GameType::Sequence, Difficulty::Easy);
        game.generate();
        let answer: Vec<i64> = game.sequence().into_iter().map(i64::from).collect();
        let result = game.check_answer(&answer);
        assert!(result.success);
        assert_eq!(result.score, 40);
        assert_eq!(game.memorization_time(), Duration::from_millis(5000));
    }

    #[test]
    fn test_card_game_answer_ignored_until_complete() {
        let mut game = Game::new(GameType::Pairs, Difficulty::Easy);
        game.generate();
        let answer: Vec<i64> = game.sequence().into_iter().map(i64::from).collect();
        assert!(!game.check_answer(&answer).success);
    }
}
