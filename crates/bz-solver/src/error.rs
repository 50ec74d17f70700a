//! Solver error types.
//!
//! [`CodeError`] is user-facing: its messages are shown next to the prompt
//! when a typed guess doesn't parse. [`SolverError`] marks misuse of the
//! solver API or an impossible feedback history.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("Input must be 4 characters long")]
    WrongLength { len: usize },

    #[error("Input must consist of A, B, C, D, E, or F")]
    InvalidSymbol { symbol: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("parameter size mismatch: {guesses} guesses, {feedbacks} feedbacks")]
    LengthMismatch { guesses: usize, feedbacks: usize },

    #[error("no code is consistent with the feedback so far")]
    NoCandidates,
}
