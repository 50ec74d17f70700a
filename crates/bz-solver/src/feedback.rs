//! Feedback — how close a guess is to the secret.
//!
//! `exact` counts positions where guess and code agree. `partial` counts
//! guess symbols that appear elsewhere in the code. Each code position
//! answers for at most one guess position, so `exact + partial <= 4`:
//!
//! ```text
//!   code  A B C D
//!   guess A A B B     exact 1 (A at 0), partial 1 (one B)
//!
//!   code  A A B B
//!   guess A B A B     exact 2, partial 2
//! ```
//!
//! Displayed as one `X` per exact hit followed by one `-` per partial hit.

use std::fmt;

use crate::code::{CODE_LEN, Code};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Feedback {
    pub exact: u8,
    pub partial: u8,
}

impl Feedback {
    /// All four symbols in place.
    pub const WIN: Self = Self::new(4, 0);

    /// Number of distinct partition slots used by [`Self::slot`].
    pub(crate) const SLOTS: usize = (CODE_LEN + 1) * (CODE_LEN + 1);

    #[must_use]
    pub const fn new(exact: u8, partial: u8) -> Self {
        Self { exact, partial }
    }

    #[must_use]
    pub const fn is_win(self) -> bool {
        self.exact as usize == CODE_LEN
    }

    /// Dense index for partition counting.
    pub(crate) const fn slot(self) -> usize {
        self.exact as usize * (CODE_LEN + 1) + self.partial as usize
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.exact {
            f.write_str("X")?;
        }
        for _ in 0..self.partial {
            f.write_str("-")?;
        }
        Ok(())
    }
}

/// Score `guess` against `code`.
///
/// Pass 1 counts and clears the exact positions. Pass 2 walks the remaining
/// guess positions and lets each consume the first uncleared, unconsumed
/// code position with the same symbol.
#[must_use]
pub fn score(code: &Code, guess: &Code) -> Feedback {
    let code = code.symbols();
    let guess = guess.symbols();
    let mut code_used = [false; CODE_LEN];
    let mut guess_used = [false; CODE_LEN];
    let mut exact = 0u8;
    let mut partial = 0u8;

    for i in 0..CODE_LEN {
        if code[i] == guess[i] {
            code_used[i] = true;
            guess_used[i] = true;
            exact += 1;
        }
    }

    for i in 0..CODE_LEN {
        if guess_used[i] {
            continue;
        }
        if let Some(k) = (0..CODE_LEN).find(|&k| !code_used[k] && code[k] == guess[i]) {
            code_used[k] = true;
            partial += 1;
        }
    }

    Feedback { exact, partial }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
