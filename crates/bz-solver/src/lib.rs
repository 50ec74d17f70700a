//! # bz-solver — code-breaking solver for bzguess
//!
//! - **[`code`]** — `Code`, the alphabet, and the 1296-code space
//! - **[`feedback`]** — `Feedback` and classic `score`
//! - **[`solver`]** — `CandidateSet`, `reduce`, minimax `best_guess`
//! - **[`error`]** — `CodeError` (bad user input) and `SolverError`

pub mod code;
pub mod error;
pub mod feedback;
pub mod solver;

pub use code::{ALPHABET, CODE_LEN, Code, SPACE_SIZE, SYMBOLS, generate_space};
pub use error::{CodeError, SolverError};
pub use feedback::{Feedback, score};
pub use solver::{CandidateSet, OPENING_GUESS, best_guess, reduce};
