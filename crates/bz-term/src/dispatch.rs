// SPDX-License-Identifier: MIT
//
// Key dispatcher — exact-match routing of queued key sequences to actions.
//
// Two keymaps are consulted, in order:
//
//   1. the global map, always active (close, new game, ...)
//   2. the active per-mode map, swapped whole on mode transitions
//
// Matching is whole-sequence equality; there is no prefix matching and no
// byte buffering across passes. Whatever doesn't match in a pass is
// dropped, so a half-delivered escape sequence can't poison later input.
//
// Keymaps are shared as `Arc<KeyMap<A>>`. A swap replaces the pointer, so a
// pass never sees a map that is half old and half new.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::keys::{Key, KeySequence, Modifiers};
use crate::queue::PendingKeyQueue;

// ─── KeyMap ─────────────────────────────────────────────────────────────────

/// Mapping from raw key sequences to actions.
#[derive(Debug, Clone)]
pub struct KeyMap<A> {
    bindings: HashMap<KeySequence, A>,
}

impl<A> Default for KeyMap<A> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<A> KeyMap<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a raw sequence. Returns the action it replaced, if any.
    pub fn bind(&mut self, sequence: KeySequence, action: A) -> Option<A> {
        self.bindings.insert(sequence, action)
    }

    /// Bind a key chord through the key table.
    ///
    /// Returns `false` (and binds nothing) when the terminal has no
    /// encoding for that modifier combination.
    pub fn bind_key(&mut self, key: Key, modifiers: Modifiers, action: A) -> bool {
        match key.entry().sequence(modifiers) {
            Some(sequence) => {
                self.bindings.insert(sequence, action);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn get(&self, sequence: &KeySequence) -> Option<&A> {
        self.bindings.get(sequence)
    }

    #[must_use]
    pub fn contains(&self, sequence: &KeySequence) -> bool {
        self.bindings.contains_key(sequence)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeySequence, &A)> {
        self.bindings.iter()
    }
}

impl<A> FromIterator<(KeySequence, A)> for KeyMap<A> {
    fn from_iter<I: IntoIterator<Item = (KeySequence, A)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

// ─── Dispatcher ─────────────────────────────────────────────────────────────

/// Routes queued sequences through the global and the active keymap.
///
/// `dispatch` takes `&mut self`, so two passes can never overlap.
#[derive(Debug)]
pub struct Dispatcher<A> {
    global: Arc<KeyMap<A>>,
    active: Arc<KeyMap<A>>,
}

impl<A> Dispatcher<A> {
    #[must_use]
    pub const fn new(global: Arc<KeyMap<A>>, active: Arc<KeyMap<A>>) -> Self {
        Self { global, active }
    }

    /// Replace the active per-mode keymap.
    pub fn set_keymap(&mut self, keymap: Arc<KeyMap<A>>) {
        trace!(bindings = keymap.len(), "active keymap swapped");
        self.active = keymap;
    }

    #[must_use]
    pub const fn active(&self) -> &Arc<KeyMap<A>> {
        &self.active
    }

    #[must_use]
    pub const fn global(&self) -> &Arc<KeyMap<A>> {
        &self.global
    }

    /// Look a sequence up: global map first, then the active map.
    #[must_use]
    pub fn lookup(&self, sequence: &KeySequence) -> Option<&A> {
        self.global
            .get(sequence)
            .or_else(|| self.active.get(sequence))
    }

    /// Run one pass over everything queued.
    ///
    /// Each matched sequence invokes `handler` with its action. If the
    /// handler returns a keymap, it becomes the active map before the next
    /// sequence of the pass is matched. Unmatched sequences are dropped.
    ///
    /// Returns whether at least one action fired.
    pub fn dispatch<F>(&mut self, queue: &PendingKeyQueue, mut handler: F) -> bool
    where
        F: FnMut(&A) -> Option<Arc<KeyMap<A>>>,
    {
        let mut fired = false;

        for sequence in queue.drain() {
            let global = Arc::clone(&self.global);
            let active = Arc::clone(&self.active);
            let Some(action) = global.get(&sequence).or_else(|| active.get(&sequence)) else {
                trace!(?sequence, "unmatched key sequence dropped");
                continue;
            };

            fired = true;
            if let Some(next) = handler(action) {
                self.set_keymap(next);
            }
        }

        fired
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
