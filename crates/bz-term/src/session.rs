// SPDX-License-Identifier: MIT
//
// Input session — owns the queue, the dispatcher and the channel lifecycle.
//
// The consumer side of the pipeline in one place:
//
//   RawInputChannel ──▶ PendingKeyQueue ──▶ Dispatcher ──▶ handler
//
// The application drives it with a cooperative loop: `poll` runs one
// dispatch pass, `wait` sleeps for the configured interval when nothing
// fired. Dropping the session stops the channel, which restores the
// terminal.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::dispatch::{Dispatcher, KeyMap};
use crate::queue::PendingKeyQueue;
use crate::reader::{ByteSource, ChannelError, RawInputChannel};

/// Default sleep between idle dispatch passes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2);

pub struct Session<A> {
    queue: PendingKeyQueue,
    dispatcher: Dispatcher<A>,
    channel: Option<RawInputChannel>,
    poll_interval: Duration,
}

impl<A> Session<A> {
    /// A session with no running channel yet.
    #[must_use]
    pub fn new(global: Arc<KeyMap<A>>, initial: Arc<KeyMap<A>>, poll_interval: Duration) -> Self {
        Self {
            queue: PendingKeyQueue::new(),
            dispatcher: Dispatcher::new(global, initial),
            channel: None,
            poll_interval,
        }
    }

    /// Start reading the terminal in raw mode.
    ///
    /// # Errors
    ///
    /// See [`RawInputChannel::start`].
    pub fn start(&mut self) -> Result<(), ChannelError> {
        self.channel = Some(RawInputChannel::start(self.queue.clone())?);
        Ok(())
    }

    /// Start reading from a custom byte source.
    ///
    /// # Errors
    ///
    /// See [`RawInputChannel::start_with`].
    pub fn start_with<S: ByteSource>(&mut self, source: S) -> Result<(), ChannelError> {
        self.channel = Some(RawInputChannel::start_with(source, self.queue.clone())?);
        Ok(())
    }

    /// Stop the channel and restore the terminal. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.stop();
        }
    }

    /// Whether the channel is still delivering input.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.channel.as_ref().is_some_and(RawInputChannel::is_running)
    }

    #[must_use]
    pub const fn queue(&self) -> &PendingKeyQueue {
        &self.queue
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Replace the active per-mode keymap.
    pub fn set_keymap(&mut self, keymap: Arc<KeyMap<A>>) {
        self.dispatcher.set_keymap(keymap);
    }

    #[must_use]
    pub const fn active_keymap(&self) -> &Arc<KeyMap<A>> {
        self.dispatcher.active()
    }

    /// One dispatch pass. See [`Dispatcher::dispatch`].
    pub fn poll<F>(&mut self, handler: F) -> bool
    where
        F: FnMut(&A) -> Option<Arc<KeyMap<A>>>,
    {
        self.dispatcher.dispatch(&self.queue, handler)
    }

    /// Sleep for one poll interval.
    pub fn wait(&self) {
        thread::sleep(self.poll_interval);
    }
}

impl<A> Drop for Session<A> {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
