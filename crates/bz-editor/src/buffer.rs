//! Editor buffer — one line of text with a cursor and a selection.
//!
//! The buffer is the data half of the line editor: it knows how to insert,
//! delete and move, but nothing about keys, modes or history.
//!
//! # Invariants
//!
//! After every operation:
//!
//! - `0 <= cursor <= len`
//! - `0 <= anchor, active <= len`
//! - an empty selection sits on the cursor
//!
//! Text is ASCII. Non-ASCII and control characters are dropped on insert,
//! so byte offsets and character offsets are the same thing.

use std::ops::Range;

use bz_term::keys::Modifiers;

use crate::word::{word_end_right, word_start_left};

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Horizontal direction for movement and deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards index 0 (Left arrow, Backspace).
    Backward,
    /// Towards the end (Right arrow, Delete).
    Forward,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A selection as an (anchor, active) pair.
///
/// The anchor stays put while Shift-movement drags the active end. The two
/// ends may be in either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub active: usize,
}

impl Selection {
    #[must_use]
    pub const fn collapsed(at: usize) -> Self {
        Self {
            anchor: at,
            active: at,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// The selected span, lower bound first.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.active)..self.anchor.max(self.active)
    }
}

// ---------------------------------------------------------------------------
// EditorBuffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorBuffer {
    text: String,
    cursor: usize,
    selection: Selection,
}

impl EditorBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer holding `text` with the cursor at its end.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.set_text(text);
        buf
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the whole text, cursor at the end, selection collapsed.
    pub fn set_text(&mut self, text: &str) {
        self.text = sanitize(text);
        self.cursor = self.text.len();
        self.selection = Selection::collapsed(self.cursor);
    }

    /// Empty the buffer and return what it held.
    pub fn take(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        self.cursor = 0;
        self.selection = Selection::collapsed(0);
        text
    }

    // -- Editing ------------------------------------------------------------

    /// Splice `s` in at the cursor and move the cursor past it.
    ///
    /// A non-empty selection is left where it is (clamped); an empty one
    /// follows the cursor.
    pub fn insert(&mut self, s: &str) {
        let s = sanitize(s);
        if s.is_empty() {
            return;
        }
        self.text.insert_str(self.cursor, &s);
        self.cursor += s.len();
        self.clamp();
    }

    /// Delete in `direction`.
    ///
    /// A non-empty selection wins: the selected span goes and everything
    /// collapses to its lower bound. Otherwise one character goes, or with
    /// `word` set the run up to the next word boundary.
    pub fn delete(&mut self, direction: Direction, word: bool) {
        if !self.selection.is_empty() {
            let span = self.selection.range();
            self.text.replace_range(span.clone(), "");
            self.cursor = span.start;
            self.selection = Selection::collapsed(span.start);
            self.clamp();
            return;
        }

        match (direction, word) {
            (Direction::Backward, true) => {
                let start = word_start_left(&self.text, self.cursor);
                self.text.replace_range(start..self.cursor, "");
                self.cursor = start;
            }
            (Direction::Backward, false) => {
                if self.cursor > 0 {
                    self.text.remove(self.cursor - 1);
                    self.cursor -= 1;
                }
            }
            (Direction::Forward, true) => {
                let end = word_end_right(&self.text, self.cursor);
                self.text.replace_range(self.cursor..end, "");
            }
            (Direction::Forward, false) => {
                if self.cursor < self.text.len() {
                    self.text.remove(self.cursor);
                }
            }
        }
        self.clamp();
    }

    // -- Movement -----------------------------------------------------------

    /// Move the cursor.
    ///
    /// | modifiers      | step                     | selection        |
    /// |----------------|--------------------------|------------------|
    /// | none           | one character            | collapse         |
    /// | `SHIFT`        | one character            | extend active end|
    /// | `CTRL`         | word boundary            | collapse         |
    /// | `ALT \| SHIFT` | word boundary            | extend active end|
    /// | `ALT`          | start or end of the line | collapse         |
    ///
    /// Any other combination does nothing.
    pub fn move_cursor(&mut self, modifiers: Modifiers, direction: Direction) {
        let word = Modifiers::ALT | Modifiers::SHIFT;

        let target = if modifiers.is_empty() || modifiers == Modifiers::SHIFT {
            match direction {
                Direction::Backward => self.cursor.saturating_sub(1),
                Direction::Forward => self.cursor + 1,
            }
        } else if modifiers == Modifiers::CTRL || modifiers == word {
            match direction {
                Direction::Backward => word_start_left(&self.text, self.cursor),
                Direction::Forward => word_end_right(&self.text, self.cursor),
            }
        } else if modifiers == Modifiers::ALT {
            match direction {
                Direction::Backward => 0,
                Direction::Forward => self.text.len(),
            }
        } else {
            return;
        };

        self.cursor = target.min(self.text.len());
        if modifiers.contains(Modifiers::SHIFT) {
            self.selection.active = self.cursor;
        } else {
            self.selection = Selection::collapsed(self.cursor);
        }
        self.clamp();
    }

    /// Re-establish the index invariants.
    fn clamp(&mut self) {
        let len = self.text.len();
        self.cursor = self.cursor.min(len);
        self.selection.anchor = self.selection.anchor.min(len);
        self.selection.active = self.selection.active.min(len);
        if self.selection.is_empty() {
            self.selection = Selection::collapsed(self.cursor);
        }
    }
}

fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(text: &str, cursor: usize) -> EditorBuffer {
        let mut b = EditorBuffer::with_text(text);
        b.move_cursor(Modifiers::ALT, Direction::Backward);
        for _ in 0..cursor {
            b.move_cursor(Modifiers::empty(), Direction::Forward);
        }
        b
    }

    fn assert_invariants(b: &EditorBuffer) {
        let len = b.len();
        assert!(b.cursor() <= len);
        assert!(b.selection().anchor <= len);
        assert!(b.selection().active <= len);
        if b.selection().is_empty() {
            assert_eq!(b.selection(), Selection::collapsed(b.cursor()));
        }
    }

    // -- Insert -------------------------------------------------------------

    #[test]
    fn insert_at_end() {
        let mut b = EditorBuffer::new();
        b.insert("AB");
        b.insert("C");
        assert_eq!(b.text(), "ABC");
        assert_eq!(b.cursor(), 3);
        assert_invariants(&b);
    }

    #[test]
    fn insert_in_middle() {
        let mut b = buf("AD", 1);
        b.insert("BC");
        assert_eq!(b.text(), "ABCD");
        assert_eq!(b.cursor(), 3);
    }

    #[test]
    fn insert_drops_non_ascii_and_controls() {
        let mut b = EditorBuffer::new();
        b.insert("a\u{e9}\x07b");
        assert_eq!(b.text(), "ab");
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn insert_keeps_nonempty_selection() {
        let mut b = buf("abcd", 0);
        b.move_cursor(Modifiers::SHIFT, Direction::Forward);
        b.move_cursor(Modifiers::SHIFT, Direction::Forward);
        b.insert("x");
        assert_eq!(b.text(), "abxcd");
        assert_eq!(b.selection(), Selection { anchor: 0, active: 2 });
        assert_eq!(b.cursor(), 3);
    }

    // -- Delete -------------------------------------------------------------

    #[test]
    fn backspace_one_char() {
        let mut b = buf("abc", 2);
        b.delete(Direction::Backward, false);
        assert_eq!(b.text(), "ac");
        assert_eq!(b.cursor(), 1);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut b = buf("abc", 0);
        b.delete(Direction::Backward, false);
        assert_eq!(b.text(), "abc");
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn forward_delete_one_char() {
        let mut b = buf("abc", 1);
        b.delete(Direction::Forward, false);
        assert_eq!(b.text(), "ac");
        assert_eq!(b.cursor(), 1);
    }

    #[test]
    fn forward_delete_at_end_is_noop() {
        let mut b = buf("abc", 3);
        b.delete(Direction::Forward, false);
        assert_eq!(b.text(), "abc");
    }

    #[test]
    fn word_backspace() {
        let mut b = EditorBuffer::with_text(".history 12");
        b.delete(Direction::Backward, true);
        assert_eq!(b.text(), ".history ");
        b.delete(Direction::Backward, true);
        assert_eq!(b.text(), "");
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn word_forward_delete() {
        let mut b = buf("ab cd ef", 2);
        b.delete(Direction::Forward, true);
        assert_eq!(b.text(), "ab ef");
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn selection_delete_takes_precedence() {
        let mut b = buf("abcdef", 4);
        b.move_cursor(Modifiers::SHIFT, Direction::Backward);
        b.move_cursor(Modifiers::SHIFT, Direction::Backward);
        b.move_cursor(Modifiers::SHIFT, Direction::Backward);
        assert_eq!(b.selection().range(), 1..4);

        // Forward delete with a word flag still just removes the selection.
        b.delete(Direction::Forward, true);
        assert_eq!(b.text(), "aef");
        assert_eq!(b.cursor(), 1);
        assert_eq!(b.selection(), Selection::collapsed(1));
    }

    #[test]
    fn selection_delete_either_order() {
        let mut b = buf("abcdef", 1);
        b.move_cursor(Modifiers::SHIFT, Direction::Forward);
        b.move_cursor(Modifiers::SHIFT, Direction::Forward);
        b.delete(Direction::Backward, false);
        assert_eq!(b.text(), "adef");
        assert_eq!(b.cursor(), 1);
    }

    // -- Movement -----------------------------------------------------------

    #[test]
    fn plain_moves_clamp_at_edges() {
        let mut b = buf("ab", 0);
        b.move_cursor(Modifiers::empty(), Direction::Backward);
        assert_eq!(b.cursor(), 0);
        b.move_cursor(Modifiers::empty(), Direction::Forward);
        b.move_cursor(Modifiers::empty(), Direction::Forward);
        b.move_cursor(Modifiers::empty(), Direction::Forward);
        assert_eq!(b.cursor(), 2);
        assert_invariants(&b);
    }

    #[test]
    fn ctrl_moves_by_word() {
        let mut b = buf("ab cd", 0);
        b.move_cursor(Modifiers::CTRL, Direction::Forward);
        assert_eq!(b.cursor(), 2);
        b.move_cursor(Modifiers::CTRL, Direction::Forward);
        assert_eq!(b.cursor(), 5);
        b.move_cursor(Modifiers::CTRL, Direction::Backward);
        assert_eq!(b.cursor(), 3);
        assert!(b.selection().is_empty());
    }

    #[test]
    fn alt_jumps_to_edges() {
        let mut b = buf("abc", 1);
        b.move_cursor(Modifiers::ALT, Direction::Forward);
        assert_eq!(b.cursor(), 3);
        b.move_cursor(Modifiers::ALT, Direction::Backward);
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn shift_extends_active_end_only() {
        let mut b = buf("abcd", 1);
        b.move_cursor(Modifiers::SHIFT, Direction::Forward);
        b.move_cursor(Modifiers::SHIFT, Direction::Forward);
        assert_eq!(b.selection(), Selection { anchor: 1, active: 3 });
        assert_eq!(b.cursor(), 3);
    }

    #[test]
    fn alt_shift_extends_by_word() {
        let mut b = buf("ab cd", 0);
        b.move_cursor(Modifiers::ALT | Modifiers::SHIFT, Direction::Forward);
        assert_eq!(b.selection(), Selection { anchor: 0, active: 2 });
        b.move_cursor(Modifiers::ALT | Modifiers::SHIFT, Direction::Forward);
        assert_eq!(b.selection(), Selection { anchor: 0, active: 5 });
    }

    #[test]
    fn unshifted_move_collapses_selection() {
        let mut b = buf("abcd", 0);
        b.move_cursor(Modifiers::SHIFT, Direction::Forward);
        b.move_cursor(Modifiers::empty(), Direction::Forward);
        assert_eq!(b.selection(), Selection::collapsed(2));
    }

    #[test]
    fn unknown_modifier_combination_is_ignored() {
        let mut b = buf("abcd", 2);
        b.move_cursor(Modifiers::CTRL | Modifiers::SHIFT, Direction::Forward);
        assert_eq!(b.cursor(), 2);
    }

    // -- Whole-text operations ----------------------------------------------

    #[test]
    fn set_text_puts_cursor_at_end() {
        let mut b = buf("xy", 0);
        b.set_text("ABCD");
        assert_eq!(b.cursor(), 4);
        assert_eq!(b.selection(), Selection::collapsed(4));
    }

    #[test]
    fn take_empties_buffer() {
        let mut b = EditorBuffer::with_text("ABCD");
        assert_eq!(b.take(), "ABCD");
        assert!(b.is_empty());
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn invariants_hold_through_mixed_edits() {
        let mut b = EditorBuffer::new();
        let moves = [
            Modifiers::empty(),
            Modifiers::SHIFT,
            Modifiers::CTRL,
            Modifiers::ALT,
            Modifiers::ALT | Modifiers::SHIFT,
        ];
        for (i, m) in moves.iter().cycle().take(40).enumerate() {
            let dir = if i % 3 == 0 { Direction::Backward } else { Direction::Forward };
            match i % 4 {
                0 => b.insert("ab "),
                1 => b.move_cursor(*m, dir),
                2 => b.delete(dir, i % 5 == 0),
                _ => b.move_cursor(*m, Direction::Backward),
            }
            assert_invariants(&b);
        }
    }
}
