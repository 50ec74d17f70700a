// SPDX-License-Identifier: MIT
//
// Pending key queue — the hand-off between the reader thread and the
// consumer loop.
//
// One producer (the input channel thread) appends whole KeySequences; one
// consumer (the dispatcher) drains everything in a single pass. Cloning the
// queue clones the handle, not the contents.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::keys::KeySequence;

/// Thread-safe FIFO of raw key sequences.
#[derive(Debug, Clone, Default)]
pub struct PendingKeyQueue {
    inner: Arc<Mutex<VecDeque<KeySequence>>>,
}

impl PendingKeyQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sequence at the back.
    pub fn push(&self, sequence: KeySequence) {
        self.lock().push_back(sequence);
    }

    /// Take every queued sequence, oldest first, leaving the queue empty.
    #[must_use]
    pub fn drain(&self) -> Vec<KeySequence> {
        self.lock().drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop everything queued.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock can't leave a VecDeque half-updated
    // in a way that matters here, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<KeySequence>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
