// SPDX-License-Identifier: MIT
//
// bz-term — raw terminal input for bzguess.
//
// Raw mode via termios, a background reader thread, and exact-match
// keymap dispatch. No TUI framework: the terminal sends bytes, we look the
// bytes up in a table, and the bound action runs.
//
//   keys      byte sequences for every logical key + modifier
//   terminal  raw mode guard, panic hook, termination signals
//   reader    the raw input channel (stdin thread)
//   queue     the pending key queue between reader and dispatcher
//   dispatch  keymaps and the dispatcher
//   session   queue + dispatcher + channel in one owner
//   ansi      escape sequences for inline line rendering

pub mod ansi;
pub mod dispatch;
pub mod keys;
pub mod queue;
pub mod reader;
pub mod session;
pub mod terminal;

pub use dispatch::{Dispatcher, KeyMap};
pub use keys::{Key, KeySequence, KeyTableEntry, Modifiers};
pub use queue::PendingKeyQueue;
pub use reader::{ByteSource, ChannelError, RawInputChannel};
pub use session::Session;
pub use terminal::RawMode;
