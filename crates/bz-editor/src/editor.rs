//! Line editor — buffer, history and mode behind one action interface.
//!
//! The dispatcher hands the editor [`EditorAction`]s; the editor mutates
//! its buffer and history and, on Enter, returns the submitted line. After
//! each action the caller asks [`LineEditor::sync_mode`] whether the mode
//! changed and, if so, swaps the active keymap.
//!
//! ```text
//!   key ──▶ EditorAction ──▶ apply() ──▶ Some(line) on submit
//!                                  └──▶ sync_mode() ──▶ Some(Mode) on change
//! ```

use bz_term::keys::Modifiers;
use tracing::debug;

use crate::buffer::{Direction, EditorBuffer};
use crate::command::{self, CommandSpec};
use crate::history::History;
use crate::keymap::EditorAction;
use crate::mode::Mode;
use crate::render::RenderModel;

#[derive(Debug, Clone)]
pub struct LineEditor {
    buffer: EditorBuffer,
    history: History,
    mode: Mode,
    commands: &'static [CommandSpec],
}

impl LineEditor {
    /// An empty editor completing against `commands`.
    #[must_use]
    pub fn new(commands: &'static [CommandSpec]) -> Self {
        Self {
            buffer: EditorBuffer::new(),
            history: History::new(),
            mode: Mode::Guess,
            commands,
        }
    }

    #[must_use]
    pub const fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Apply one action. Returns the line on submit.
    pub fn apply(&mut self, action: EditorAction) -> Option<String> {
        match action {
            EditorAction::Insert(ch) => {
                let mut tmp = [0u8; 4];
                self.insert(ch.encode_utf8(&mut tmp));
            }
            EditorAction::Delete { direction, word } => self.delete(direction, word),
            EditorAction::Move { modifiers, direction } => self.move_cursor(modifiers, direction),
            EditorAction::HistoryUp => self.cycle_history_up(),
            EditorAction::HistoryDown => self.cycle_history_down(),
            EditorAction::HistoryTop => self.cycle_history_top(),
            EditorAction::HistoryBottom => self.cycle_history_bottom(),
            EditorAction::Submit => return Some(self.submit()),
            EditorAction::Complete => self.complete(),
        }
        None
    }

    // -- Editing ------------------------------------------------------------

    pub fn insert(&mut self, s: &str) {
        self.buffer.insert(s);
    }

    pub fn delete(&mut self, direction: Direction, word: bool) {
        self.buffer.delete(direction, word);
    }

    pub fn move_cursor(&mut self, modifiers: Modifiers, direction: Direction) {
        self.buffer.move_cursor(modifiers, direction);
    }

    /// Insert the current suggestion, if there is one.
    pub fn complete(&mut self) {
        if let Some(rest) = self.suggest() {
            let rest = rest.to_owned();
            self.buffer.insert(&rest);
        }
    }

    // -- History ------------------------------------------------------------

    pub fn cycle_history_up(&mut self) {
        if let Some(line) = self.history.up(self.buffer.text()) {
            self.buffer.set_text(line);
        }
    }

    pub fn cycle_history_down(&mut self) {
        if let Some(line) = self.history.down() {
            self.buffer.set_text(line);
        }
    }

    pub fn cycle_history_top(&mut self) {
        if let Some(line) = self.history.top(self.buffer.text()) {
            self.buffer.set_text(line);
        }
    }

    pub fn cycle_history_bottom(&mut self) {
        if let Some(line) = self.history.bottom() {
            self.buffer.set_text(line);
        }
    }

    /// Take the line, record it in history, and start a fresh one.
    pub fn submit(&mut self) -> String {
        let line = self.buffer.take();
        self.history.submit(&line);
        debug!(line = %line, "line submitted");
        line
    }

    // -- Mode ---------------------------------------------------------------

    /// Re-derive the mode from the text. Returns the new mode on a change.
    pub fn sync_mode(&mut self) -> Option<Mode> {
        let mode = Mode::of(self.buffer.text());
        if mode == self.mode {
            return None;
        }
        debug!(from = %self.mode, to = %mode, "editor mode changed");
        self.mode = mode;
        Some(mode)
    }

    // -- Presentation -------------------------------------------------------

    /// Completion for the current text. See [`command::suggest`].
    #[must_use]
    pub fn suggest(&self) -> Option<&str> {
        command::suggest(self.commands, self.buffer.text())
    }

    /// Pure snapshot of what the prompt line should show.
    #[must_use]
    pub fn render_model(&self, prompt: &str) -> RenderModel {
        let text = match Mode::of(self.buffer.text()) {
            Mode::Guess => self.buffer.text().to_ascii_uppercase(),
            Mode::Command => self.buffer.text().to_owned(),
        };
        let selection = self.buffer.selection();

        RenderModel {
            prompt: prompt.to_owned(),
            text,
            cursor_column: prompt.chars().count() + self.buffer.cursor(),
            selection: (!selection.is_empty()).then(|| selection.range()),
            suggestion: self.suggest().map(str::to_owned),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
