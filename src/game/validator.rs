pub struct AnswerValidator;

impl AnswerValidator {
    /// Exact match: same length, same order, same values
    pub fn matches_sequence(expected: &[u32], answer: &[i64]) -> bool {
        expected.len() == answer.len()
            && expected
                .iter()
                .zip(answer)
                .all(|(want, got)| i64::from(*want) == *got)
    }

    /// Check a pair-sequence answer.
    ///
    /// The answer is read two entries at a time; the i-th chunk must contain
    /// the i-th generated pair value twice. Callers check the overall length
    /// first so they can report it separately.
    pub fn matches_pairs(pairs: &[u32], answer: &[i64]) -> bool {
        if answer.len() != pairs.len() * 2 {
            return false;
        }

        pairs
            .iter()
            .zip(answer.chunks_exact(2))
            .all(|(value, chunk)| chunk[0] == chunk[1] && chunk[0] == i64::from(*value))
    }
}
