// SPDX-License-Identifier: MIT
//
// Error types for the game binary.
//
// Three families:
//
//   InputError  → something the player typed. Shown in red after the typed
//                 line; the editor keeps running.
//   ConfigError → the configuration file could not be read or is invalid.
//                 Fatal at startup.
//   AppError    → anything that ends the program with a non-zero status.

use std::io;

use bz_solver::{CodeError, SolverError};
use bz_term::ChannelError;
use thiserror::Error;

/// A rejected line. The `Display` text is what the player sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please input a command or a 4-character sequence")]
    Empty,

    #[error(transparent)]
    Guess(#[from] CodeError),

    #[error("Unknown command")]
    UnknownCommand { name: String },

    #[error("At least one argument expected")]
    MissingArgument,

    #[error("Only one argument expected")]
    TooManyArguments,

    #[error("New code may only contain 4 characters")]
    NewCodeLength,

    #[error("New code must consist of A, B, C, D, E, or F")]
    NewCodeSymbols,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("There is no game number {0}")]
    NoSuchGame(usize),

    #[error("Cursor style must be a number from 0 to 6")]
    CursorStyle,

    #[error("The game is already over")]
    GameOver,

    #[error(transparent)]
    Solver(#[from] SolverError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Fatal errors, reported once by `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("input: {0}")]
    Channel(#[from] ChannelError),

    #[error("terminal: {0}")]
    Io(#[from] io::Error),
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_errors_pass_through() {
        let err = InputError::from(CodeError::WrongLength { len: 2 });
        assert_eq!(err.to_string(), "Input must be 4 characters long");
        let err = InputError::from(CodeError::InvalidSymbol { symbol: 'x' });
        assert_eq!(err.to_string(), "Input must consist of A, B, C, D, E, or F");
    }

    #[test]
    fn empty_line_message() {
        assert_eq!(
            InputError::Empty.to_string(),
            "Please input a command or a 4-character sequence"
        );
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::Invalid("attempts must be at least 1".into());
        assert_eq!(err.to_string(), "invalid config: attempts must be at least 1");
    }

    #[test]
    fn app_error_keeps_config_message() {
        let err = AppError::from(ConfigError::Invalid("color".into()));
        assert_eq!(err.to_string(), "invalid config: color");
        let err = AppError::from(io::Error::other("broken pipe"));
        assert_eq!(err.to_string(), "terminal: broken pipe");
    }
}
