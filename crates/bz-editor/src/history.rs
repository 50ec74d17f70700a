//! Line history — previously submitted lines with a scratch slot.
//!
//! Slot 0 is reserved for the line being typed. Navigating away from slot 0
//! first saves the live buffer there, so coming back down restores it:
//!
//! ```text
//!   index:   0          1        2        3
//!   entries: [scratch,  "ABCD",  ".new",  "AABB"]   newest → oldest
//! ```
//!
//! Navigation returns the text the editor should mirror into its buffer,
//! or `None` when the move is a no-op. Edits made while sitting on an older
//! slot are not written back; only slot 0 is ever overwritten.

/// Maximum number of submitted lines kept, scratch slot not included.
pub const HISTORY_MAX: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self {
            entries: vec![String::new()],
            index: 0,
        }
    }
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots, scratch included (always at least 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the scratch slot exists from the start.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Which slot the buffer currently mirrors.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// All slots, newest first, scratch at 0.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Step to the next older line.
    pub fn up(&mut self, current: &str) -> Option<&str> {
        if self.index == 0 {
            current.clone_into(&mut self.entries[0]);
        }
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    /// Step to the next newer line.
    pub fn down(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Jump to the oldest line.
    pub fn top(&mut self, current: &str) -> Option<&str> {
        if self.index == 0 {
            current.clone_into(&mut self.entries[0]);
        }
        let oldest = self.entries.len() - 1;
        if self.index == oldest {
            return None;
        }
        self.index = oldest;
        Some(&self.entries[self.index])
    }

    /// Jump back to the scratch slot.
    pub fn bottom(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index = 0;
        Some(&self.entries[0])
    }

    /// Record a submitted line.
    ///
    /// The line replaces the scratch slot, a fresh empty scratch slot is
    /// pushed in front of it, and navigation resets to slot 0.
    pub fn submit(&mut self, line: &str) {
        line.clone_into(&mut self.entries[0]);
        self.entries.insert(0, String::new());
        self.index = 0;

        // Trim the oldest line to stay within the limit.
        if self.entries.len() > HISTORY_MAX + 1 {
            self.entries.pop();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
