//! Input modes.
//!
//! The line editor is in exactly one [`Mode`], derived from the text alone:
//! a leading `.` means the line is a command, anything else is a guess.
//!
//! | Mode    | Letters insert   | Extra keys       | Display      |
//! |---------|------------------|------------------|--------------|
//! | Guess   | uppercase        | none             | upper-cased  |
//! | Command | as typed         | space `-` `,` `/`| as typed     |

use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// A 4-letter code guess.
    #[default]
    Guess,
    /// A `.command` line.
    Command,
}

impl Mode {
    /// Mode for a line of text.
    #[must_use]
    pub fn of(text: &str) -> Self {
        if text.starts_with('.') {
            Self::Command
        } else {
            Self::Guess
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Guess => "GUESS",
            Self::Command => "COMMAND",
        }
    }

    #[must_use]
    pub const fn is_command(self) -> bool {
        matches!(self, Self::Command)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_guess() {
        assert_eq!(Mode::default(), Mode::Guess);
    }

    #[test]
    fn derived_from_first_char() {
        assert_eq!(Mode::of(""), Mode::Guess);
        assert_eq!(Mode::of("ABCD"), Mode::Guess);
        assert_eq!(Mode::of(".help"), Mode::Command);
        assert_eq!(Mode::of("."), Mode::Command);
        assert_eq!(Mode::of("A.B"), Mode::Guess);
    }

    #[test]
    fn display() {
        assert_eq!(Mode::Guess.to_string(), "GUESS");
        assert_eq!(Mode::Command.to_string(), "COMMAND");
        assert!(Mode::Command.is_command());
    }
}
