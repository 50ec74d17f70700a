//! Per-mode keymaps for the line editor.
//!
//! Each mode gets its own complete [`KeyMap`]; switching modes swaps the
//! whole map. The maps are generic over the application's action type so
//! they can sit in the same dispatcher as the application's global keys.
//!
//! Shared bindings (both modes):
//!
//! | Key                         | Action                          |
//! |-----------------------------|---------------------------------|
//! | Enter                       | submit                          |
//! | Backspace / Delete          | delete a char (Ctrl: a word)    |
//! | Left / Right (+ modifiers)  | move, see [`EditorBuffer::move_cursor`] |
//! | Home / End                  | start / end of line             |
//! | Up / Down                   | history (Shift: oldest / newest)|
//! | Tab                         | accept the suggestion           |
//!
//! [`EditorBuffer::move_cursor`]: crate::buffer::EditorBuffer::move_cursor

use std::sync::Arc;

use bz_term::dispatch::KeyMap;
use bz_term::keys::{Key, Modifiers, TABLE_MODIFIERS};

use crate::buffer::Direction;
use crate::mode::Mode;

/// What a key asks the line editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Insert(char),
    Delete { direction: Direction, word: bool },
    Move { modifiers: Modifiers, direction: Direction },
    HistoryUp,
    HistoryDown,
    HistoryTop,
    HistoryBottom,
    Submit,
    /// Insert the current suggestion.
    Complete,
}

/// Build the complete keymap for `mode`.
#[must_use]
pub fn keymap_for<A: From<EditorAction>>(mode: Mode) -> KeyMap<A> {
    let mut map = KeyMap::new();
    bind_shared(&mut map);

    for d in 0..=9u8 {
        bind(&mut map, Key::Digit(d), Modifiers::empty(), EditorAction::Insert(char::from(b'0' + d)));
    }
    bind(&mut map, Key::Period, Modifiers::empty(), EditorAction::Insert('.'));

    for ch in 'a'..='z' {
        let upper = ch.to_ascii_uppercase();
        let base = match mode {
            Mode::Guess => upper,
            Mode::Command => ch,
        };
        bind(&mut map, Key::Letter(ch), Modifiers::empty(), EditorAction::Insert(base));
        bind(&mut map, Key::Letter(ch), Modifiers::SHIFT, EditorAction::Insert(upper));
    }

    if mode == Mode::Command {
        bind(&mut map, Key::Space, Modifiers::empty(), EditorAction::Insert(' '));
        bind(&mut map, Key::Minus, Modifiers::empty(), EditorAction::Insert('-'));
        bind(&mut map, Key::Comma, Modifiers::empty(), EditorAction::Insert(','));
        bind(&mut map, Key::Slash, Modifiers::empty(), EditorAction::Insert('/'));
    }

    map
}

fn bind_shared<A: From<EditorAction>>(map: &mut KeyMap<A>) {
    use Direction::{Backward, Forward};

    bind(map, Key::Enter, Modifiers::empty(), EditorAction::Submit);
    bind(map, Key::Tab, Modifiers::empty(), EditorAction::Complete);

    bind(map, Key::Backspace, Modifiers::empty(), EditorAction::Delete { direction: Backward, word: false });
    bind(map, Key::Backspace, Modifiers::CTRL, EditorAction::Delete { direction: Backward, word: true });
    bind(map, Key::Delete, Modifiers::empty(), EditorAction::Delete { direction: Forward, word: false });
    bind(map, Key::Delete, Modifiers::CTRL, EditorAction::Delete { direction: Forward, word: true });

    for modifiers in TABLE_MODIFIERS {
        bind(map, Key::Left, modifiers, EditorAction::Move { modifiers, direction: Backward });
        bind(map, Key::Right, modifiers, EditorAction::Move { modifiers, direction: Forward });
    }
    bind(map, Key::Home, Modifiers::empty(), EditorAction::Move { modifiers: Modifiers::ALT, direction: Backward });
    bind(map, Key::End, Modifiers::empty(), EditorAction::Move { modifiers: Modifiers::ALT, direction: Forward });

    bind(map, Key::Up, Modifiers::empty(), EditorAction::HistoryUp);
    bind(map, Key::Down, Modifiers::empty(), EditorAction::HistoryDown);
    bind(map, Key::Up, Modifiers::SHIFT, EditorAction::HistoryTop);
    bind(map, Key::Down, Modifiers::SHIFT, EditorAction::HistoryBottom);
}

fn bind<A: From<EditorAction>>(map: &mut KeyMap<A>, key: Key, modifiers: Modifiers, action: EditorAction) {
    // Every chord bound here exists in the key table.
    let bound = map.bind_key(key, modifiers, A::from(action));
    debug_assert!(bound, "no encoding for {key:?} + {modifiers:?}");
}

// ---------------------------------------------------------------------------
// ModeKeymaps
// ---------------------------------------------------------------------------

/// Both mode keymaps, built once and shared.
#[derive(Debug)]
pub struct ModeKeymaps<A> {
    guess: Arc<KeyMap<A>>,
    command: Arc<KeyMap<A>>,
}

impl<A: From<EditorAction>> ModeKeymaps<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            guess: Arc::new(keymap_for(Mode::Guess)),
            command: Arc::new(keymap_for(Mode::Command)),
        }
    }
}

impl<A: From<EditorAction>> Default for ModeKeymaps<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ModeKeymaps<A> {
    /// The shared map for `mode`.
    #[must_use]
    pub fn for_mode(&self, mode: Mode) -> Arc<KeyMap<A>> {
        match mode {
            Mode::Guess => Arc::clone(&self.guess),
            Mode::Command => Arc::clone(&self.command),
        }
    }
}

impl<A> Clone for ModeKeymaps<A> {
    fn clone(&self) -> Self {
        Self {
            guess: Arc::clone(&self.guess),
            command: Arc::clone(&self.command),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
