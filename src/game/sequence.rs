use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{
    game::{AnswerValidator, Scorer},
    models::{Difficulty, GameResult},
};

/// Recall game: memorize a row of numbers and type them back in order.
///
/// Also backs the "numbers" game type, which shares the mechanic.
#[derive(Debug)]
pub struct SequenceGame {
    difficulty: Difficulty,
    rng: StdRng,
    sequence: Vec<u32>,
}

impl SequenceGame {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_os_rng())
    }

    pub fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        Self {
            difficulty,
            rng,
            sequence: Vec::new(),
        }
    }

    /// Replace the challenge with a fresh one
    pub fn generate(&mut self) {
        let length = self.difficulty.sequence_length();
        let range = self.difficulty.number_range();

        self.sequence.clear();
        self.sequence.reserve(length);
        for _ in 0..length {
            self.sequence.push(self.rng.random_range(1..=range));
        }
    }

    pub fn check_answer(&self, answer: &[i64]) -> GameResult {
        if AnswerValidator::matches_sequence(&self.sequence, answer) {
            GameResult::win(
                Scorer::sequence(self.sequence.len()),
                "Correct! You remembered the sequence.",
            )
        } else {
            GameResult::loss("Incorrect. Try again!")
        }
    }

    pub fn sequence(&self) -> &[u32] {
        &self.sequence
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

/// Pair recall game: a shuffled row where every value appears twice. The
/// player answers with the pairs, in the order they were generated.
#[derive(Debug)]
pub struct PairSequenceGame {
    difficulty: Difficulty,
    rng: StdRng,
    pairs: Vec<u32>,
    sequence: Vec<u32>,
}

impl PairSequenceGame {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_os_rng())
    }

    pub fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        Self {
            difficulty,
            rng,
            pairs: Vec::new(),
            sequence: Vec::new(),
        }
    }

    pub fn generate(&mut self) {
        let pair_count = self.difficulty.sequence_length() / 2;
        let range = self.difficulty.number_range();

        self.pairs = (0..pair_count)
            .map(|_| self.rng.random_range(1..=range))
            .collect();

        self.sequence = self.pairs.iter().flat_map(|&v| [v, v]).collect();
        self.sequence.shuffle(&mut self.rng);
    }

    pub fn check_answer(&self, answer: &[i64]) -> GameResult {
        if answer.len() != self.sequence.len() {
            return GameResult::loss("Wrong number of elements!");
        }

        if AnswerValidator::matches_pairs(&self.pairs, answer) {
            GameResult::win(
                Scorer::pair_sequence(self.pairs.len()),
                "All pairs are correct!",
            )
        } else {
            GameResult::loss("Incorrect. Try again!")
        }
    }

    /// Values in the order they are shown to the player
    pub fn sequence(&self) -> &[u32] {
        &self.sequence
    }

    /// Pair values in generation order
    pub fn pairs(&self) -> &[u32] {
        &self.pairs
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    fn as_answer(values: &[u32]) -> Vec<i64> {
        values.iter().map(|&v| i64::from(v)).collect()
    }

    #[test]
    fn test_sequence_length_and_range() {
        for difficulty in ALL {
            for _ in 0..50 {
                let mut game = SequenceGame::new(difficulty);
                game.generate();
                assert_eq!(game.sequence().len(), difficulty.sequence_length());
                assert!(game
                    .sequence()
                    .iter()
                    .all(|&v| (1..=difficulty.number_range()).contains(&v)));
            }
        }
    }

    #[test]
    fn test_correct_answer_scores_length_times_ten() {
        for difficulty in ALL {
            let mut game = SequenceGame::new(difficulty);
            game.generate();
            let result = game.check_answer(&as_answer(game.sequence()));
            assert!(result.success);
            assert_eq!(result.score, difficulty.sequence_length() as u32 * 10);
        }
    }

    #[test]
    fn test_wrong_answer_scores_zero() {
        let mut game = SequenceGame::with_rng(Difficulty::Easy, StdRng::seed_from_u64(7));
        game.generate();

        let mut answer = as_answer(game.sequence());
        answer[0] = if answer[0] == 1 { 2 } else { 1 };
        let result = game.check_answer(&answer);
        assert!(!result.success);
        assert_eq!(result.score, 0);

        let truncated = as_answer(&game.sequence()[..3]);
        assert!(!game.check_answer(&truncated).success);
    }

    #[test]
    fn test_check_answer_does_not_change_challenge() {
        let mut game = SequenceGame::new(Difficulty::Medium);
        game.generate();
        let before = game.sequence().to_vec();
        game.check_answer(&[1, 2, 3]);
        game.check_answer(&as_answer(&before));
        assert_eq!(game.sequence(), before.as_slice());
    }

    #[test]
    fn test_pair_sequence_contains_each_value_twice() {
        for difficulty in ALL {
            let mut game = PairSequenceGame::new(difficulty);
            game.generate();
            assert_eq!(game.sequence().len(), difficulty.sequence_length());
            assert_eq!(game.pairs().len(), difficulty.sequence_length() / 2);

            let mut shown = game.sequence().to_vec();
            let mut expected: Vec<u32> = game.pairs().iter().flat_map(|&v| [v, v]).collect();
            shown.sort_unstable();
            expected.sort_unstable();
            assert_eq!(shown, expected);
        }
    }

    #[test]
    fn test_pair_sequence_answer() {
        let mut game = PairSequenceGame::with_rng(Difficulty::Easy, StdRng::seed_from_u64(3));
        game.generate();

        let answer: Vec<i64> = game
            .pairs()
            .iter()
            .flat_map(|&v| [i64::from(v), i64::from(v)])
            .collect();
        let result = game.check_answer(&answer);
        assert!(result.success);
        assert_eq!(result.score, 30);

        let result = game.check_answer(&answer[..2]);
        assert!(!result.success);
        assert_eq!(result.message, "Wrong number of elements!");
    }
}
