//! Candidate tracking and guess selection.
//!
//! A [`CandidateSet`] holds every code still consistent with the feedback
//! seen so far. [`reduce`] filters it against the full guess history;
//! [`best_guess`] picks the next guess by minimax:
//!
//! ```text
//!   for each guess g in the full space (enumeration order):
//!       partition candidates by score(candidate, g)
//!       worst(g) = largest partition
//!   pick the first g with the smallest worst(g)
//! ```
//!
//! Guesses are drawn from the whole space, not just the candidates, so the
//! chosen guess can be one that cannot itself win but splits the rest best.

use std::time::Instant;

use tracing::{debug, error};

use crate::code::{CODE_LEN, Code, SPACE_SIZE, generate_space};
use crate::error::SolverError;
use crate::feedback::{Feedback, score};

/// The opening guess when nothing is known yet.
pub const OPENING_GUESS: Code = Code::from_index(7); // AABB

// ---------------------------------------------------------------------------
// CandidateSet
// ---------------------------------------------------------------------------

/// Codes still possible for the secret, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    codes: Vec<Code>,
}

impl CandidateSet {
    /// Every code.
    #[must_use]
    pub fn full() -> Self {
        Self { codes: generate_space() }
    }

    #[must_use]
    pub const fn from_codes(codes: Vec<Code>) -> Self {
        Self { codes }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Nothing has been ruled out yet.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.codes.len() == SPACE_SIZE
    }

    #[must_use]
    pub fn codes(&self) -> &[Code] {
        &self.codes
    }

    #[must_use]
    pub fn contains(&self, code: &Code) -> bool {
        self.codes.contains(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter()
    }

    /// Keep only codes with `symbol` at `pos`. Returns the remaining count.
    ///
    /// An out-of-range `pos` leaves the set untouched.
    pub fn retain_symbol_at(&mut self, pos: usize, symbol: u8) -> usize {
        if pos < CODE_LEN {
            self.codes.retain(|c| c.symbol(pos) == symbol);
        }
        self.codes.len()
    }
}

impl Default for CandidateSet {
    fn default() -> Self {
        Self::full()
    }
}

// ---------------------------------------------------------------------------
// reduce / best_guess
// ---------------------------------------------------------------------------

fn check_lengths(guesses: &[Code], feedbacks: &[Feedback]) -> Result<(), SolverError> {
    if guesses.len() == feedbacks.len() {
        return Ok(());
    }
    let err = SolverError::LengthMismatch {
        guesses: guesses.len(),
        feedbacks: feedbacks.len(),
    };
    error!(%err, "solver called with mismatched history");
    Err(err)
}

/// Drop every candidate that wouldn't reproduce the recorded feedback.
///
/// A candidate survives if, for each `i`, `score(candidate, guesses[i])`
/// equals `feedbacks[i]`. Returns the number of survivors.
///
/// # Errors
///
/// [`SolverError::LengthMismatch`] if the two slices differ in length; the
/// set is left untouched.
pub fn reduce(
    candidates: &mut CandidateSet,
    guesses: &[Code],
    feedbacks: &[Feedback],
) -> Result<usize, SolverError> {
    check_lengths(guesses, feedbacks)?;
    if guesses.is_empty() {
        return Ok(candidates.len());
    }

    let before = candidates.len();
    candidates.codes.retain(|candidate| {
        guesses
            .iter()
            .zip(feedbacks)
            .all(|(guess, &fb)| score(candidate, guess) == fb)
    });
    debug!(before, after = candidates.len(), "candidates reduced");
    Ok(candidates.len())
}

/// Size of the largest partition `guess` would split `candidates` into.
fn worst_case(candidates: &[Code], guess: &Code) -> usize {
    let mut partitions = [0usize; Feedback::SLOTS];
    for candidate in candidates {
        partitions[score(candidate, guess).slot()] += 1;
    }
    partitions.into_iter().max().unwrap_or(0)
}

/// The next guess to play.
///
/// Reduces `candidates` first, so the set reflects the history afterwards.
///
/// - no guesses yet and nothing ruled out: [`OPENING_GUESS`]
/// - one candidate left: that candidate
/// - otherwise: the minimax guess over the full space, first one wins ties
///
/// # Errors
///
/// [`SolverError::LengthMismatch`] for mismatched history, and
/// [`SolverError::NoCandidates`] if the feedback contradicts itself.
pub fn best_guess(
    candidates: &mut CandidateSet,
    guesses: &[Code],
    feedbacks: &[Feedback],
) -> Result<Code, SolverError> {
    check_lengths(guesses, feedbacks)?;
    if guesses.is_empty() && candidates.is_full() {
        return Ok(OPENING_GUESS);
    }

    reduce(candidates, guesses, feedbacks)?;
    match candidates.codes() {
        [] => {
            error!("feedback history leaves no candidates");
            return Err(SolverError::NoCandidates);
        }
        [only] => return Ok(*only),
        _ => {}
    }

    let start = Instant::now();
    let mut best = OPENING_GUESS;
    let mut best_worst = usize::MAX;
    for index in 0..SPACE_SIZE {
        let guess = Code::from_index(index);
        let worst = worst_case(candidates.codes(), &guess);
        if worst < best_worst {
            best = guess;
            best_worst = worst;
        }
    }

    debug!(
        candidates = candidates.len(),
        guess = %best,
        worst = best_worst,
        elapsed_ms = start.elapsed().as_millis(),
        "minimax guess"
    );
    Ok(best)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    /// Play the solver against `secret` until it wins. Returns the guesses.
    fn solve(secret: Code) -> Vec<Code> {
        let mut candidates = CandidateSet::full();
        let mut guesses = Vec::new();
        let mut feedbacks = Vec::new();
        for _ in 0..10 {
            let guess = best_guess(&mut candidates, &guesses, &feedbacks).unwrap();
            let fb = score(&secret, &guess);
            guesses.push(guess);
            feedbacks.push(fb);
            if fb.is_win() {
                return guesses;
            }
        }
        panic!("solver did not find {secret} in 10 guesses: {guesses:?}");
    }

    #[test]
    fn opening_guess_is_aabb() {
        assert_eq!(OPENING_GUESS.to_string(), "AABB");
        let mut set = CandidateSet::full();
        assert_eq!(best_guess(&mut set, &[], &[]), Ok(code("AABB")));
        assert!(set.is_full());
    }

    #[test]
    fn reduce_after_aabb_miss_leaves_256() {
        let mut set = CandidateSet::full();
        let n = reduce(&mut set, &[code("AABB")], &[Feedback::new(0, 0)]).unwrap();
        assert_eq!(n, 256);
        assert!(set.iter().all(|c| !c.symbols().contains(&0) && !c.symbols().contains(&1)));
    }

    #[test]
    fn reduce_with_no_history_is_noop() {
        let mut set = CandidateSet::full();
        assert_eq!(reduce(&mut set, &[], &[]), Ok(SPACE_SIZE));
    }

    #[test]
    fn reduce_rejects_length_mismatch() {
        let mut set = CandidateSet::full();
        assert_eq!(
            reduce(&mut set, &[code("AABB"), code("CCDD")], &[Feedback::new(0, 0)]),
            Err(SolverError::LengthMismatch { guesses: 2, feedbacks: 1 })
        );
        assert!(set.is_full());
    }

    #[test]
    fn best_guess_rejects_length_mismatch() {
        let mut set = CandidateSet::full();
        assert_eq!(
            best_guess(&mut set, &[], &[Feedback::new(0, 0)]),
            Err(SolverError::LengthMismatch { guesses: 0, feedbacks: 1 })
        );
    }

    #[test]
    fn single_candidate_is_returned() {
        let secret = code("CAFE");
        let mut set = CandidateSet::full();
        assert_eq!(best_guess(&mut set, &[secret], &[Feedback::WIN]), Ok(secret));
        assert_eq!(set.codes(), &[secret]);
    }

    #[test]
    fn contradictory_feedback_has_no_candidates() {
        let mut set = CandidateSet::full();
        let g = code("AABB");
        let result = best_guess(&mut set, &[g, g], &[Feedback::new(0, 0), Feedback::new(1, 0)]);
        assert_eq!(result, Err(SolverError::NoCandidates));
        assert!(set.is_empty());
    }

    #[test]
    fn reduced_set_gets_minimax_guess() {
        // After a buy the set is no longer full, so minimax runs even
        // without guesses.
        let mut set = CandidateSet::full();
        set.retain_symbol_at(0, 5);
        let guess = best_guess(&mut set, &[], &[]).unwrap();
        assert_eq!(set.len(), 216);

        let chosen = worst_case(set.codes(), &guess);
        assert!(chosen < 216);
        assert!(generate_space().iter().all(|g| worst_case(set.codes(), g) >= chosen));
    }

    #[test]
    fn minimax_picks_first_of_equal_guesses() {
        // Two candidates: any guess holding a D or an E tells them apart,
        // and AAAD is the first such code.
        let mut set = CandidateSet::from_codes(vec![code("ABCD"), code("ABCE")]);
        let guess = best_guess(&mut set, &[], &[]).unwrap();
        assert_eq!(guess, code("AAAD"));
    }

    #[test]
    fn retain_symbol_at() {
        let mut set = CandidateSet::full();
        assert_eq!(set.retain_symbol_at(2, 3), 216);
        assert!(set.iter().all(|c| c.symbol(2) == 3));
        assert_eq!(set.retain_symbol_at(0, 0), 36);
        assert_eq!(set.retain_symbol_at(9, 0), 36);
    }

    #[test]
    fn solves_sample_secrets() {
        for s in ["AAAA", "ABCD", "FFFF", "CAFE", "BEEF", "DCBA"] {
            let secret = code(s);
            let guesses = solve(secret);
            assert_eq!(guesses.last(), Some(&secret));
            assert!(guesses.len() <= 7, "{s} took {}", guesses.len());
        }
    }

    #[test]
    fn secret_survives_reduction() {
        let secret = code("EDAF");
        let guesses = [code("AABB"), code("CCDD"), code("EFEF")];
        let feedbacks: Vec<_> = guesses.iter().map(|g| score(&secret, g)).collect();
        let mut set = CandidateSet::full();
        reduce(&mut set, &guesses, &feedbacks).unwrap();
        assert!(set.contains(&secret));
    }

    fn any_code() -> impl Strategy<Value = Code> {
        (0..SPACE_SIZE).prop_map(Code::from_index)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn reduce_is_monotone(
            secret in any_code(),
            first in any_code(),
            second in any_code(),
        ) {
            let mut set = CandidateSet::full();
            let g1 = [first];
            let f1 = [score(&secret, &first)];
            let after_one = reduce(&mut set, &g1, &f1).unwrap();

            let g2 = [first, second];
            let f2 = [f1[0], score(&secret, &second)];
            let after_two = reduce(&mut set, &g2, &f2).unwrap();

            prop_assert!(after_two <= after_one);
            prop_assert!(after_one <= SPACE_SIZE);
            prop_assert!(set.contains(&secret));
        }

        #[test]
        fn best_guess_is_consistent_when_one_left(secret in any_code()) {
            let mut set = CandidateSet::full();
            let guess = best_guess(&mut set, &[secret], &[Feedback::WIN]).unwrap();
            prop_assert_eq!(guess, secret);
        }
    }
}
