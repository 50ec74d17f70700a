// SPDX-License-Identifier: MIT
//
// Renderer — turns render models and output lines into escape sequences.
//
// The game draws inline, like a shell: finished lines scroll up, and the
// bottom line is the live prompt, repainted in place after every key.
//
//   20> AABB X-               ← committed guess
//   19> .hi|story             ← live prompt: text, cursor, dim suggestion
//
// With color off only the structural sequences remain (erase line, cursor
// column, selection inverse).

use std::io::{self, Write};

use bz_editor::RenderModel;
use bz_term::ansi::{self, Color};

use crate::commands::{Line, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    pub color: bool,
}

impl Painter {
    #[must_use]
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    fn fg(self, w: &mut impl Write, color: Color) -> io::Result<()> {
        if self.color { ansi::fg(w, color) } else { Ok(()) }
    }

    fn bold(self, w: &mut impl Write) -> io::Result<()> {
        if self.color { ansi::bold(w) } else { Ok(()) }
    }

    fn reset(self, w: &mut impl Write) -> io::Result<()> {
        if self.color { ansi::reset(w) } else { Ok(()) }
    }

    fn prompt_label(self, w: &mut impl Write, prompt: &str, color: Color) -> io::Result<()> {
        self.fg(w, color)?;
        self.bold(w)?;
        w.write_all(prompt.as_bytes())?;
        self.reset(w)
    }

    /// Repaint the live prompt line and park the cursor.
    ///
    /// `error` is painted red after the text; the suggestion is hidden while
    /// an error is showing.
    pub fn prompt(self, w: &mut impl Write, model: &RenderModel, error: Option<&str>) -> io::Result<()> {
        ansi::erase_line(w)?;
        self.prompt_label(w, &model.prompt, Color::Green)?;

        let (before, selected, after) = model.segments();
        w.write_all(before.as_bytes())?;
        if !selected.is_empty() {
            ansi::inverse(w)?;
            w.write_all(selected.as_bytes())?;
            ansi::inverse_off(w)?;
        }
        w.write_all(after.as_bytes())?;

        if let Some(message) = error {
            w.write_all(b" ")?;
            self.fg(w, Color::Red)?;
            self.bold(w)?;
            w.write_all(message.as_bytes())?;
            self.reset(w)?;
        } else if let Some(suggestion) = &model.suggestion {
            self.fg(w, Color::Gray)?;
            w.write_all(suggestion.as_bytes())?;
            self.reset(w)?;
        }

        let column = u16::try_from(model.cursor_column).unwrap_or(u16::MAX);
        ansi::cursor_to_column(w, column)?;
        w.flush()
    }

    /// Replace the prompt line with a finished guess and its feedback.
    pub fn committed(self, w: &mut impl Write, prompt: &str, guess: &str, feedback: &str) -> io::Result<()> {
        ansi::erase_line(w)?;
        self.prompt_label(w, prompt, Color::Green)?;
        w.write_all(guess.as_bytes())?;
        w.write_all(b" ")?;
        self.bold(w)?;
        w.write_all(feedback.as_bytes())?;
        self.reset(w)?;
        ansi::newline(w)
    }

    /// Start typing an AI guess: the prompt in red.
    pub fn ai_prompt(self, w: &mut impl Write, prompt: &str) -> io::Result<()> {
        ansi::erase_line(w)?;
        self.prompt_label(w, prompt, Color::Red)?;
        w.flush()
    }

    /// Finish the prompt line as typed and move below it.
    pub fn echo(self, w: &mut impl Write, prompt: &str, text: &str) -> io::Result<()> {
        ansi::erase_line(w)?;
        self.prompt_label(w, prompt, Color::Green)?;
        w.write_all(text.as_bytes())?;
        ansi::newline(w)
    }

    /// One full output line.
    pub fn line(self, w: &mut impl Write, line: &Line) -> io::Result<()> {
        ansi::erase_line(w)?;
        match line.tone {
            Tone::Plain => {}
            Tone::Heading => self.bold(w)?,
            Tone::Muted => self.fg(w, Color::Indexed(241))?,
        }
        w.write_all(line.text.as_bytes())?;
        if line.tone != Tone::Plain {
            self.reset(w)?;
        }
        ansi::newline(w)
    }

    /// A one-line status message in `color`.
    pub fn message(self, w: &mut impl Write, text: &str, color: Color) -> io::Result<()> {
        ansi::erase_line(w)?;
        self.fg(w, color)?;
        w.write_all(text.as_bytes())?;
        self.reset(w)?;
        ansi::newline(w)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
