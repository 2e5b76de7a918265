pub struct Scorer;

impl Scorer {
    /// Points per remembered item in a sequence game
    const SEQUENCE_POINTS: u32 = 10;
    /// Points per correctly reproduced pair in a pair-sequence game
    const PAIR_SEQUENCE_POINTS: u32 = 15;
    /// Base points per pair found in a card game
    const CARD_PAIR_POINTS: u32 = 10;
    /// Bonus per move saved below the 2x-pairs budget
    const SAVED_MOVE_POINTS: u32 = 5;

    /// Score for a correctly recalled sequence of `length` items
    pub fn sequence(length: usize) -> u32 {
        length as u32 * Self::SEQUENCE_POINTS
    }

    /// Score for a correctly reproduced pair sequence with `pairs` pairs
    pub fn pair_sequence(pairs: usize) -> u32 {
        pairs as u32 * Self::PAIR_SEQUENCE_POINTS
    }

    /// Score for a completed card game.
    ///
    /// Scoring rules:
    /// - Every pair is worth a flat base amount
    /// - A player gets two moves per pair for free; each move saved below that
    ///   budget adds a bonus
    /// - The bonus never goes negative, so the base score is the floor
    pub fn card_pairs(total_pairs: usize, moves: u32) -> u32 {
        let base = total_pairs as u32 * Self::CARD_PAIR_POINTS;
        base + Self::move_bonus(total_pairs, moves)
    }

    fn move_bonus(total_pairs: usize, moves: u32) -> u32 {
        let budget = total_pairs as u32 * 2;
        budget.saturating_sub(moves) * Self::SAVED_MOVE_POINTS
    }
}
