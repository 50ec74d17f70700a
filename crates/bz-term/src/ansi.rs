// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit. The game draws inline on the normal
// screen, one prompt line at a time, so everything here is column-based:
// erase the current line, paint it, park the cursor at a column.
//
// Columns are 0-indexed in our API and converted to 1-indexed for the
// terminal.

use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column `col` of the current line (CHA).
#[inline]
pub fn cursor_to_column(w: &mut impl Write, col: u16) -> io::Result<()> {
    write!(w, "\x1b[{}G", u32::from(col) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Lines ───────────────────────────────────────────────────────────────────

/// Return to column 0 and erase the whole current line (EL 2).
#[inline]
pub fn erase_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r\x1b[2K")
}

/// Start a new line. With `OPOST` off, `\n` alone doesn't return the
/// carriage.
#[inline]
pub fn newline(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r\n")
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

#[inline]
pub fn bold(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[1m")
}

/// Swap foreground and background (SGR 7). Used for selections.
#[inline]
pub fn inverse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[7m")
}

#[inline]
pub fn inverse_off(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[27m")
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// The handful of foreground colors the game uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Gray,
    /// A 256-color palette index.
    Indexed(u8),
}

/// Set the foreground color.
///
/// Named colors use the compact SGR codes (31-36, 90); palette indices use
/// the `38;5;N` extended form.
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    let code: u8 = match color {
        Color::Red => 31,
        Color::Green => 32,
        Color::Yellow => 33,
        Color::Blue => 34,
        Color::Magenta => 35,
        Color::Cyan => 36,
        Color::Gray => 90,
        Color::Indexed(n) => return write!(w, "\x1b[38;5;{n}m"),
    };
    write!(w, "\x1b[{code}m")
}

// ─── Cursor Shape ───────────────────────────────────────────────────────────

/// Terminal cursor shape (DECSCUSR — Set Cursor Style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Terminal default (usually blinking block).
    #[default]
    Default,
    BlinkBlock,
    SteadyBlock,
    BlinkUnderline,
    SteadyUnderline,
    /// Blinking bar (I-beam) cursor.
    BlinkBar,
    SteadyBar,
}

impl CursorShape {
    /// Every shape, indexed by its DECSCUSR parameter.
    pub const ALL: [Self; 7] = [
        Self::Default,
        Self::BlinkBlock,
        Self::SteadyBlock,
        Self::BlinkUnderline,
        Self::SteadyUnderline,
        Self::BlinkBar,
        Self::SteadyBar,
    ];

    /// Shape for a DECSCUSR parameter (0-6).
    #[must_use]
    pub fn from_index(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n)).copied()
    }

    /// The DECSCUSR parameter for this shape.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::BlinkBlock => 1,
            Self::SteadyBlock => 2,
            Self::BlinkUnderline => 3,
            Self::SteadyUnderline => 4,
            Self::BlinkBar => 5,
            Self::SteadyBar => 6,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "terminal default",
            Self::BlinkBlock => "blinking block",
            Self::SteadyBlock => "steady block",
            Self::BlinkUnderline => "blinking underline",
            Self::SteadyUnderline => "steady underline",
            Self::BlinkBar => "blinking bar",
            Self::SteadyBar => "steady bar",
        }
    }
}

/// Set the cursor shape using DECSCUSR.
#[inline]
pub fn set_cursor_shape(w: &mut impl Write, shape: CursorShape) -> io::Result<()> {
    write!(w, "\x1b[{} q", shape.index())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
