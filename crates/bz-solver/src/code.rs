//! Codes — four symbols over the alphabet `A..=F`.
//!
//! A [`Code`] stores symbol indices (`0..6`), not letters. Parsing is
//! case-insensitive; display is always uppercase.
//!
//! # Enumeration order
//!
//! [`generate_space`] lists all 1296 codes as a base-6 count with the first
//! position most significant:
//!
//! ```text
//!   index 0    AAAA
//!   index 1    AAAB
//!   index 6    AABA
//!   index 1295 FFFF
//! ```
//!
//! The order is load-bearing: it is the tie-break order for the minimax
//! guess.

use std::fmt;
use std::str::FromStr;

use crate::error::CodeError;

/// Positions in a code.
pub const CODE_LEN: usize = 4;

/// Distinct symbols.
pub const SYMBOLS: u8 = 6;

/// Display letters, indexed by symbol.
pub const ALPHABET: [char; SYMBOLS as usize] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Number of distinct codes (`6^4`).
pub const SPACE_SIZE: usize = 1296;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code([u8; CODE_LEN]);

impl Code {
    /// A code from symbol indices. `None` if any index is `>= 6`.
    #[must_use]
    pub fn new(symbols: [u8; CODE_LEN]) -> Option<Self> {
        symbols.iter().all(|&s| s < SYMBOLS).then_some(Self(symbols))
    }

    /// The code at `index` in enumeration order, wrapping past 1295.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        let mut symbols = [0u8; CODE_LEN];
        let mut rest = index % SPACE_SIZE;
        let mut pos = CODE_LEN;
        while pos > 0 {
            pos -= 1;
            #[allow(clippy::cast_possible_truncation)] // < 6
            {
                symbols[pos] = (rest % SYMBOLS as usize) as u8;
            }
            rest /= SYMBOLS as usize;
        }
        Self(symbols)
    }

    /// Position of this code in enumeration order.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
            .iter()
            .fold(0, |acc, &s| acc * SYMBOLS as usize + usize::from(s))
    }

    #[must_use]
    pub const fn symbols(&self) -> [u8; CODE_LEN] {
        self.0
    }

    /// Symbol index at `pos` (`0..4`).
    #[must_use]
    pub const fn symbol(&self, pos: usize) -> u8 {
        self.0[pos]
    }
}

impl FromStr for Code {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != CODE_LEN {
            return Err(CodeError::WrongLength { len });
        }

        let mut symbols = [0u8; CODE_LEN];
        for (slot, ch) in symbols.iter_mut().zip(s.chars()) {
            *slot = symbol_index(ch).ok_or(CodeError::InvalidSymbol { symbol: ch })?;
        }
        Ok(Self(symbols))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &s in &self.0 {
            write!(f, "{}", symbol_char(s))?;
        }
        Ok(())
    }
}

/// Symbol index for a letter, case-insensitive.
#[must_use]
pub fn symbol_index(ch: char) -> Option<u8> {
    let upper = ch.to_ascii_uppercase();
    ALPHABET
        .iter()
        .position(|&c| c == upper)
        .and_then(|i| u8::try_from(i).ok())
}

/// Letter for a symbol index; `?` outside the alphabet.
#[must_use]
pub fn symbol_char(symbol: u8) -> char {
    ALPHABET.get(usize::from(symbol)).copied().unwrap_or('?')
}

/// Every code, in enumeration order.
#[must_use]
pub fn generate_space() -> Vec<Code> {
    (0..SPACE_SIZE).map(Code::from_index).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
