//! # bz-editor — the bzguess line editor
//!
//! A single-line editor driven by raw key actions:
//!
//! - **[`buffer`]** — `EditorBuffer`: text, cursor, selection
//! - **[`word`]** — whitespace-delimited word boundaries
//! - **[`history`]** — submitted lines with a scratch slot
//! - **[`mode`]** — `Guess` vs `Command`, derived from the leading `.`
//! - **[`keymap`]** — `EditorAction` and the per-mode keymaps
//! - **[`command`]** — `.name args` parsing, lookup and completion
//! - **[`editor`]** — `LineEditor` tying the above together
//! - **[`render`]** — the pure `RenderModel` handed to a renderer

pub mod buffer;
pub mod command;
pub mod editor;
pub mod history;
pub mod keymap;
pub mod mode;
pub mod render;
pub mod word;

pub use buffer::{Direction, EditorBuffer, Selection};
pub use command::{CommandSpec, ParsedCommand};
pub use editor::LineEditor;
pub use history::History;
pub use keymap::{EditorAction, ModeKeymaps};
pub use mode::Mode;
pub use render::RenderModel;
