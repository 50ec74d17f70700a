//! Word boundaries for the line editor.
//!
//! A word here is any run of non-whitespace. Both scans work the same way
//! from the reference index: skip the whitespace next to it, then skip the
//! run of non-whitespace, and stop at the first whitespace or the buffer
//! edge.
//!
//! ```text
//!   "ab cd"      word_end_right(_, 0) == 2     word_start_left(_, 5) == 3
//!    ^ ^ ^
//!    0 2 3
//! ```
//!
//! The line editor is ASCII-only, so byte indices are character indices.

/// Start of the word to the left of `from`.
///
/// Returns 0 at the left edge. `from` past the end is treated as the end.
#[must_use]
pub fn word_start_left(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = from.min(bytes.len());

    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    while i > 0 && !bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    i
}

/// End of the word to the right of `from`.
///
/// Returns `text.len()` at the right edge.
#[must_use]
pub fn word_end_right(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = from.min(bytes.len());

    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
