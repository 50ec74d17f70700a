// SPDX-License-Identifier: MIT
//
// Key table — the raw bytes a terminal sends for each key.
//
// In raw mode the terminal does not send "events", it sends bytes. A plain
// letter is one byte, an arrow is a three-byte CSI sequence, Ctrl+Right is a
// six-byte CSI sequence with a modifier parameter. This module is the static
// dictionary between logical keys and those byte strings.
//
// Matching is exact and whole-sequence (see `dispatch.rs`): there is no
// incremental parser here. Each key knows up to five encodings:
//
//   base, Shift, Ctrl, Alt, Alt+Shift
//
// A variant the terminal cannot tell apart from another variant of the same
// key (Shift+Backspace, Ctrl+1, ...) is simply absent. Encodings may still
// collide *across* keys: Ctrl+H and Ctrl+Backspace are both 0x08, and Ctrl+I
// is Tab.
//
// Modifier parameters follow xterm: `CSI 1 ; m X` with m = 1 + bitmask,
// i.e. 2 = Shift, 3 = Alt, 4 = Alt+Shift, 5 = Ctrl.

use std::fmt;

use bitflags::bitflags;

// ─── KeySequence ────────────────────────────────────────────────────────────

/// Longest byte string a single read may deliver as one sequence.
pub const MAX_SEQUENCE_LEN: usize = 8;

/// An immutable byte sequence produced by one physical key press.
///
/// Stored inline (no heap), compared and hashed structurally, so it can be
/// used directly as a `HashMap` key. Unused trailing bytes are always zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySequence {
    bytes: [u8; MAX_SEQUENCE_LEN],
    len: u8,
}

impl KeySequence {
    /// Build a sequence from raw bytes.
    ///
    /// Returns `None` for an empty slice or one longer than
    /// [`MAX_SEQUENCE_LEN`].
    #[must_use]
    pub fn new(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() || bytes.len() > MAX_SEQUENCE_LEN {
            return None;
        }
        Some(Self::from_static(bytes))
    }

    /// Build a sequence from a table literal.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is empty or longer than [`MAX_SEQUENCE_LEN`]. Only
    /// used with the literals in this module.
    #[must_use]
    pub const fn from_static(bytes: &[u8]) -> Self {
        assert!(!bytes.is_empty() && bytes.len() <= MAX_SEQUENCE_LEN);
        let mut buf = [0u8; MAX_SEQUENCE_LEN];
        let mut i = 0;
        while i < bytes.len() {
            buf[i] = bytes[i];
            i += 1;
        }
        #[allow(clippy::cast_possible_truncation)] // len <= 8
        Self {
            bytes: buf,
            len: bytes.len() as u8,
        }
    }

    /// The bytes of this sequence.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of bytes in the sequence (1..=8).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always `false` for a constructed sequence.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeySequence({:?})", self.as_bytes())
    }
}

// ─── Modifiers ──────────────────────────────────────────────────────────────

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Bit values match the xterm CSI modifier encoding
    /// (`param = 1 + bitmask`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

/// The five modifier combinations the key table knows, in table order.
pub const TABLE_MODIFIERS: [Modifiers; 5] = [
    Modifiers::empty(),
    Modifiers::SHIFT,
    Modifiers::CTRL,
    Modifiers::ALT,
    Modifiers::ALT.union(Modifiers::SHIFT),
];

// ─── Key ────────────────────────────────────────────────────────────────────

/// Logical identity of a key, independent of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Escape,
    PageUp,
    PageDown,
    Home,
    End,
    Up,
    Down,
    Right,
    Left,
    Delete,
    /// A lowercase ASCII letter `a..=z`.
    Letter(char),
    /// A digit `0..=9`.
    Digit(u8),
    /// Function keys F1 through F12.
    F(u8),
    Period,
    Space,
    Minus,
    Comma,
    Slash,
}

impl Key {
    /// Every key in the table, in table order.
    ///
    /// The order matters for [`describe`]: on an ambiguous sequence the
    /// first key listed wins.
    pub fn all() -> impl Iterator<Item = Self> {
        const NAMED: [Key; 13] = [
            Key::Backspace,
            Key::Tab,
            Key::Enter,
            Key::Escape,
            Key::PageUp,
            Key::PageDown,
            Key::Home,
            Key::End,
            Key::Up,
            Key::Down,
            Key::Right,
            Key::Left,
            Key::Delete,
        ];
        const PUNCT: [Key; 5] = [Key::Period, Key::Space, Key::Minus, Key::Comma, Key::Slash];

        NAMED
            .into_iter()
            .chain(('a'..='z').map(Key::Letter))
            .chain((0..=9).map(Key::Digit))
            .chain((1..=12).map(Key::F))
            .chain(PUNCT)
    }

    /// The table entry for this key.
    ///
    /// Keys outside the table's domain (`Letter` with a non-lowercase char,
    /// `Digit` > 9, `F` outside 1..=12) fall back to an entry whose base
    /// sequence is the closest sensible byte and with no modifier variants.
    #[must_use]
    pub fn entry(self) -> KeyTableEntry {
        match self {
            Self::Backspace => KeyTableEntry {
                key: self,
                base: seq(&[0x7f]),
                shift: None,
                ctrl: Some(seq(&[0x08])),
                alt: Some(seq(&[0x1b, 0x7f])),
                alt_shift: None,
            },
            Self::Tab => KeyTableEntry {
                key: self,
                base: seq(&[0x09]),
                shift: Some(seq(b"\x1b[Z")),
                ctrl: None,
                alt: None,
                alt_shift: None,
            },
            Self::Enter => KeyTableEntry {
                key: self,
                base: seq(&[0x0d]),
                shift: None,
                ctrl: None,
                alt: Some(seq(&[0x1b, 0x0d])),
                alt_shift: None,
            },
            Self::Escape => KeyTableEntry::plain(self, seq(&[0x1b])),
            Self::PageUp => csi_tilde(self, b"5"),
            Self::PageDown => csi_tilde(self, b"6"),
            Self::Home => csi_final(self, b'H'),
            Self::End => csi_final(self, b'F'),
            Self::Up => csi_final(self, b'A'),
            Self::Down => csi_final(self, b'B'),
            Self::Right => csi_final(self, b'C'),
            Self::Left => csi_final(self, b'D'),
            Self::Delete => csi_tilde(self, b"3"),
            Self::Letter(ch) => letter(self, ch),
            Self::Digit(d) => KeyTableEntry::plain(self, seq(&[b'0' + d.min(9)])),
            Self::F(n) => function_key(self, n),
            Self::Period => punct(self, b'.', None),
            Self::Space => punct(self, b' ', Some(0x00)),
            Self::Minus => punct(self, b'-', None),
            Self::Comma => punct(self, b',', None),
            Self::Slash => punct(self, b'/', Some(0x1f)),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backspace => f.write_str("Backspace"),
            Self::Tab => f.write_str("Tab"),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Esc"),
            Self::PageUp => f.write_str("PageUp"),
            Self::PageDown => f.write_str("PageDown"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Right => f.write_str("Right"),
            Self::Left => f.write_str("Left"),
            Self::Delete => f.write_str("Delete"),
            Self::Letter(ch) => write!(f, "{}", ch.to_ascii_uppercase()),
            Self::Digit(d) => write!(f, "{d}"),
            Self::F(n) => write!(f, "F{n}"),
            Self::Period => f.write_str("."),
            Self::Space => f.write_str("Space"),
            Self::Minus => f.write_str("-"),
            Self::Comma => f.write_str(","),
            Self::Slash => f.write_str("/"),
        }
    }
}

/// Human-readable chord label, e.g. `Ctrl+Left` or `Alt+Shift+A`.
#[must_use]
pub fn chord_label(key: Key, modifiers: Modifiers) -> String {
    let mut label = String::new();
    if modifiers.contains(Modifiers::CTRL) {
        label.push_str("Ctrl+");
    }
    if modifiers.contains(Modifiers::ALT) {
        label.push_str("Alt+");
    }
    if modifiers.contains(Modifiers::SHIFT) {
        label.push_str("Shift+");
    }
    label.push_str(&key.to_string());
    label
}

// ─── KeyTableEntry ──────────────────────────────────────────────────────────

/// All known encodings of one logical key.
///
/// Within an entry the defined sequences are mutually distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTableEntry {
    pub key: Key,
    pub base: KeySequence,
    pub shift: Option<KeySequence>,
    pub ctrl: Option<KeySequence>,
    pub alt: Option<KeySequence>,
    pub alt_shift: Option<KeySequence>,
}

impl KeyTableEntry {
    /// An entry with only a base encoding.
    const fn plain(key: Key, base: KeySequence) -> Self {
        Self {
            key,
            base,
            shift: None,
            ctrl: None,
            alt: None,
            alt_shift: None,
        }
    }

    /// The encoding for a modifier combination, if the terminal has one.
    ///
    /// Only the five table combinations can match; anything else (e.g.
    /// Ctrl+Shift) returns `None`.
    #[must_use]
    pub fn sequence(&self, modifiers: Modifiers) -> Option<KeySequence> {
        if modifiers.is_empty() {
            Some(self.base)
        } else if modifiers == Modifiers::SHIFT {
            self.shift
        } else if modifiers == Modifiers::CTRL {
            self.ctrl
        } else if modifiers == Modifiers::ALT {
            self.alt
        } else if modifiers == Modifiers::ALT | Modifiers::SHIFT {
            self.alt_shift
        } else {
            None
        }
    }

    /// Every defined `(modifiers, sequence)` pair, base first.
    pub fn variants(&self) -> impl Iterator<Item = (Modifiers, KeySequence)> + '_ {
        TABLE_MODIFIERS
            .into_iter()
            .filter_map(|m| self.sequence(m).map(|s| (m, s)))
    }
}

/// Reverse lookup: which key and modifiers produced `sequence`?
///
/// Ambiguous sequences resolve to the first key in [`Key::all`] order.
#[must_use]
pub fn describe(sequence: &KeySequence) -> Option<(Key, Modifiers)> {
    Key::all().find_map(|key| {
        key.entry()
            .variants()
            .find(|(_, s)| s == sequence)
            .map(|(m, _)| (key, m))
    })
}

// ─── Builders ───────────────────────────────────────────────────────────────

#[inline]
const fn seq(bytes: &[u8]) -> KeySequence {
    KeySequence::from_static(bytes)
}

/// xterm modifier parameter digit for a table modifier combination.
const MOD_SHIFT: u8 = b'2';
const MOD_ALT: u8 = b'3';
const MOD_ALT_SHIFT: u8 = b'4';
const MOD_CTRL: u8 = b'5';

/// `CSI X` keys (arrows, Home, End): modified form is `CSI 1 ; m X`.
fn csi_final(key: Key, fin: u8) -> KeyTableEntry {
    let modded = |m: u8| seq(&[0x1b, b'[', b'1', b';', m, fin]);
    KeyTableEntry {
        key,
        base: seq(&[0x1b, b'[', fin]),
        shift: Some(modded(MOD_SHIFT)),
        ctrl: Some(modded(MOD_CTRL)),
        alt: Some(modded(MOD_ALT)),
        alt_shift: Some(modded(MOD_ALT_SHIFT)),
    }
}

/// `CSI n ~` keys (Delete, PageUp, F5+): modified form is `CSI n ; m ~`.
fn csi_tilde(key: Key, number: &[u8]) -> KeyTableEntry {
    let build = |m: Option<u8>| {
        let mut bytes = Vec::with_capacity(MAX_SEQUENCE_LEN);
        bytes.extend_from_slice(b"\x1b[");
        bytes.extend_from_slice(number);
        if let Some(m) = m {
            bytes.push(b';');
            bytes.push(m);
        }
        bytes.push(b'~');
        seq(&bytes)
    };
    KeyTableEntry {
        key,
        base: build(None),
        shift: Some(build(Some(MOD_SHIFT))),
        ctrl: Some(build(Some(MOD_CTRL))),
        alt: Some(build(Some(MOD_ALT))),
        alt_shift: Some(build(Some(MOD_ALT_SHIFT))),
    }
}

fn letter(key: Key, ch: char) -> KeyTableEntry {
    if !ch.is_ascii_lowercase() {
        let byte = u8::try_from(ch).unwrap_or(b'?');
        return KeyTableEntry::plain(key, seq(&[byte]));
    }
    #[allow(clippy::cast_possible_truncation)] // ASCII
    let lower = ch as u8;
    let upper = lower.to_ascii_uppercase();
    KeyTableEntry {
        key,
        base: seq(&[lower]),
        shift: Some(seq(&[upper])),
        ctrl: Some(seq(&[lower - b'a' + 1])),
        alt: Some(seq(&[0x1b, lower])),
        alt_shift: Some(seq(&[0x1b, upper])),
    }
}

fn function_key(key: Key, n: u8) -> KeyTableEntry {
    match n {
        // F1-F4 arrive as SS3 unmodified and as CSI 1 ; m P..S modified.
        1..=4 => {
            let fin = b'P' + (n - 1);
            let modded = |m: u8| seq(&[0x1b, b'[', b'1', b';', m, fin]);
            KeyTableEntry {
                key,
                base: seq(&[0x1b, b'O', fin]),
                shift: Some(modded(MOD_SHIFT)),
                ctrl: Some(modded(MOD_CTRL)),
                alt: Some(modded(MOD_ALT)),
                alt_shift: Some(modded(MOD_ALT_SHIFT)),
            }
        }
        5 => csi_tilde(key, b"15"),
        6 => csi_tilde(key, b"17"),
        7 => csi_tilde(key, b"18"),
        8 => csi_tilde(key, b"19"),
        9 => csi_tilde(key, b"20"),
        10 => csi_tilde(key, b"21"),
        11 => csi_tilde(key, b"23"),
        12 => csi_tilde(key, b"24"),
        _ => KeyTableEntry::plain(key, seq(&[0x1b])),
    }
}

fn punct(key: Key, byte: u8, ctrl: Option<u8>) -> KeyTableEntry {
    KeyTableEntry {
        key,
        base: seq(&[byte]),
        shift: None,
        ctrl: ctrl.map(|c| seq(&[c])),
        alt: Some(seq(&[0x1b, byte])),
        alt_shift: None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
