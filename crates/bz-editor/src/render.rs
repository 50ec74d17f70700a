//! Render model — what the prompt line should look like, as plain data.
//!
//! The line editor never writes escape sequences. It hands the renderer a
//! [`RenderModel`] and the renderer decides how to paint it. This keeps the
//! editor testable without a terminal.
//!
//! ```text
//!   19> .hi|story
//!   ^^^^ prompt
//!       ^^^ text       ^ cursor_column = 7
//!          ^^^^^ suggestion (painted dim, not part of the text)
//! ```

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderModel {
    pub prompt: String,
    /// Buffer text, upper-cased in guess mode.
    pub text: String,
    /// Display column of the cursor, prompt included.
    pub cursor_column: usize,
    /// Byte span of `text` to paint inverted, if anything is selected.
    pub selection: Option<Range<usize>>,
    /// Completion text to paint after `text`.
    pub suggestion: Option<String>,
}

impl RenderModel {
    /// Display width of prompt plus text.
    #[must_use]
    pub fn width(&self) -> usize {
        self.prompt.chars().count() + self.text.len()
    }

    /// `text` split around the selection: before, selected, after.
    #[must_use]
    pub fn segments(&self) -> (&str, &str, &str) {
        match &self.selection {
            Some(span) if span.end <= self.text.len() && span.start <= span.end => (
                &self.text[..span.start],
                &self.text[span.clone()],
                &self.text[span.end..],
            ),
            _ => (&self.text, "", ""),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
