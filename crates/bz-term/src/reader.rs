// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Raw input channel — a background thread that turns stdin reads into
// queued key sequences.
//
// Each successful read of up to 8 bytes becomes exactly one KeySequence,
// verbatim and unsplit. There is no parser here: a terminal delivers one
// escape sequence per read at typing speed, and the dispatcher matches
// whole sequences. A fast paste arrives as one oversized chunk that matches
// nothing and gets dropped.
//
// Shutdown: the thread polls stdin with a short timeout and checks an
// `AtomicBool` stop flag between polls, so `stop()` never waits on a
// blocking `read()`.
//
// The channel is a process-wide singleton: two readers on one stdin would
// race each other for bytes. A static flag is claimed on start and released
// on stop.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::keys::{KeySequence, MAX_SEQUENCE_LEN};
use crate::queue::PendingKeyQueue;
use crate::terminal::RawMode;

/// How long one `poll()` waits before the stop flag is re-checked
/// (milliseconds). Bounds shutdown latency.
const POLL_TIMEOUT_MS: i32 = 50;

/// Claimed by the one live channel in this process.
static CHANNEL_ACTIVE: AtomicBool = AtomicBool::new(false);

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("raw input channel is already running")]
    AlreadyRunning,

    #[error("failed to spawn input thread: {0}")]
    Spawn(#[source] io::Error),
}

// ─── ByteSource ─────────────────────────────────────────────────────────────

/// Where the channel thread gets its bytes.
///
/// `read_chunk` should wait a short while for input and then return:
/// `Ok(None)` on timeout, `Ok(Some(0))` at end of input, `Ok(Some(n))` after
/// filling `buf[..n]`. Any error ends the read loop.
pub trait ByteSource: Send + 'static {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>>;
}

/// Standard input, read with `poll()` + `read()` on fd 0.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        let fd = libc::STDIN_FILENO;

        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            // A signal woke us up; let the loop check its stop flag.
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(err);
        }
        if ready == 0 {
            return Ok(None);
        }

        let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(None),
                _ => Err(err),
            };
        }

        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(Some(n as usize))
    }
}

/// Non-unix fallback: plain blocking reads, so `stop()` may have to wait
/// for the next key.
#[cfg(not(unix))]
impl ByteSource for StdinSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        use std::io::Read;
        io::stdin().lock().read(buf).map(Some)
    }
}

// ─── RawInputChannel ────────────────────────────────────────────────────────

/// Background reader feeding a [`PendingKeyQueue`].
///
/// The thread runs until [`stop`](Self::stop) is called, the channel is
/// dropped, or the source reports EOF or an error. In the last two cases
/// [`is_running`](Self::is_running) turns false but the singleton claim is
/// held until `stop`/drop.
///
/// ```no_run
/// use bz_term::queue::PendingKeyQueue;
/// use bz_term::reader::RawInputChannel;
///
/// let queue = PendingKeyQueue::new();
/// let mut channel = RawInputChannel::start(queue.clone())?;
/// // ... drain `queue` from the consumer loop ...
/// channel.stop();
/// # Ok::<(), bz_term::reader::ChannelError>(())
/// ```
pub struct RawInputChannel {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    raw_mode: Option<RawMode>,
    claimed: bool,
}

impl RawInputChannel {
    /// Switch the terminal to raw mode and start reading stdin.
    ///
    /// A failed mode switch is logged and the channel runs anyway.
    ///
    /// # Errors
    ///
    /// [`ChannelError::AlreadyRunning`] if another channel is live,
    /// [`ChannelError::Spawn`] if the thread can't be created.
    pub fn start(queue: PendingKeyQueue) -> Result<Self, ChannelError> {
        claim()?;

        let raw_mode = match RawMode::enter() {
            Ok(guard) => Some(guard),
            Err(err) => {
                warn!(%err, "could not switch terminal to raw mode");
                None
            }
        };

        Self::spawn(StdinSource, queue, raw_mode)
    }

    /// Start reading from an arbitrary source. The terminal mode is left
    /// alone.
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start).
    pub fn start_with<S: ByteSource>(source: S, queue: PendingKeyQueue) -> Result<Self, ChannelError> {
        claim()?;
        Self::spawn(source, queue, None)
    }

    fn spawn<S: ByteSource>(
        source: S,
        queue: PendingKeyQueue,
        raw_mode: Option<RawMode>,
    ) -> Result<Self, ChannelError> {
        let stop = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));
        let stop_flag = Arc::clone(&stop);
        let running_flag = Arc::clone(&running);

        let spawned = thread::Builder::new()
            .name("bz-input".into())
            .spawn(move || read_loop(source, &queue, &stop_flag, &running_flag));

        match spawned {
            Ok(handle) => {
                info!("raw input channel started");
                Ok(Self {
                    handle: Some(handle),
                    stop,
                    running,
                    raw_mode,
                    claimed: true,
                })
            }
            Err(err) => {
                error!(%err, "failed to spawn input thread");
                drop(raw_mode);
                release();
                Err(ChannelError::Spawn(err))
            }
        }
    }

    /// Whether the read loop is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Whether this channel switched the terminal into raw mode.
    #[must_use]
    pub fn owns_raw_mode(&self) -> bool {
        self.raw_mode.as_ref().is_some_and(RawMode::is_active)
    }

    /// Stop the thread, join it, restore cooked mode and release the
    /// singleton claim. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("input thread panicked");
            }
        }
        self.running.store(false, Ordering::Release);

        if let Some(mut raw) = self.raw_mode.take() {
            if let Err(err) = raw.restore() {
                warn!(%err, "failed to restore terminal mode");
            }
        }

        if self.claimed {
            self.claimed = false;
            release();
            info!("raw input channel stopped");
        }
    }
}

impl Drop for RawInputChannel {
    fn drop(&mut self) {
        self.stop();
    }
}

fn claim() -> Result<(), ChannelError> {
    CHANNEL_ACTIVE
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .map(|_| ())
        .map_err(|_| {
            error!("raw input channel started twice");
            ChannelError::AlreadyRunning
        })
}

fn release() {
    CHANNEL_ACTIVE.store(false, Ordering::Release);
}

/// The reader thread's main loop.
fn read_loop<S: ByteSource>(
    mut source: S,
    queue: &PendingKeyQueue,
    stop: &AtomicBool,
    running: &AtomicBool,
) {
    let mut buf = [0u8; MAX_SEQUENCE_LEN];

    while !stop.load(Ordering::Relaxed) {
        match source.read_chunk(&mut buf) {
            Ok(None) => {}
            Ok(Some(0)) => {
                debug!("input reached end of file");
                break;
            }
            Ok(Some(n)) => {
                if let Some(sequence) = buf.get(..n).and_then(KeySequence::new) {
                    queue.push(sequence);
                }
            }
            Err(err) => {
                error!(%err, "input read failed");
                break;
            }
        }
    }

    running.store(false, Ordering::Release);
}

// ─── Tests ───────────────────────────────────────────────────────────────────

/// Channel tests in this crate share the process-wide singleton, so they
/// take this lock first.
#[cfg(test)]
pub(crate) static CHANNEL_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    pub enum Step {
        Data(&'static [u8]),
        Eof,
        Fail,
    }

    /// Plays back a fixed script, then times out forever.
    pub struct ScriptedSource {
        steps: VecDeque<Step>,
    }

    impl ScriptedSource {
        pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
            Self {
                steps: steps.into_iter().collect(),
            }
        }

        pub fn idle() -> Self {
            Self {
                steps: VecDeque::new(),
            }
        }
    }

    impl ByteSource for ScriptedSource {
        fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
            match self.steps.pop_front() {
                Some(Step::Data(bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    Ok(Some(n))
                }
                Some(Step::Eof) => Ok(Some(0)),
                Some(Step::Fail) => Err(io::Error::other("scripted failure")),
                None => {
                    thread::sleep(Duration::from_millis(1));
                    Ok(None)
                }
            }
        }
    }

    pub fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        cond()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{ScriptedSource, Step, wait_until};
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{MutexGuard, PoisonError};

    fn serial() -> MutexGuard<'static, ()> {
        CHANNEL_TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn seq(bytes: &[u8]) -> KeySequence {
        KeySequence::new(bytes).unwrap()
    }

    #[test]
    fn poll_timeout_reasonable() {
        assert!(POLL_TIMEOUT_MS >= 10);
        assert!(POLL_TIMEOUT_MS <= 500);
    }

    #[test]
    fn reads_become_whole_sequences() {
        let _guard = serial();
        let queue = PendingKeyQueue::new();
        let source = ScriptedSource::new([Step::Data(b"\x1b[1;5D"), Step::Data(b"a")]);
        let mut channel = RawInputChannel::start_with(source, queue.clone()).unwrap();

        assert!(wait_until(|| queue.len() == 2));
        assert_eq!(queue.drain(), vec![seq(b"\x1b[1;5D"), seq(b"a")]);
        channel.stop();
    }

    #[test]
    fn burst_stays_one_sequence() {
        let _guard = serial();
        let queue = PendingKeyQueue::new();
        let source = ScriptedSource::new([Step::Data(b"abcd")]);
        let _channel = RawInputChannel::start_with(source, queue.clone()).unwrap();

        assert!(wait_until(|| queue.len() == 1));
        assert_eq!(queue.drain(), vec![seq(b"abcd")]);
    }

    #[test]
    fn second_start_is_rejected() {
        let _guard = serial();
        let queue = PendingKeyQueue::new();
        let mut first = RawInputChannel::start_with(ScriptedSource::idle(), queue.clone()).unwrap();

        let second = RawInputChannel::start_with(ScriptedSource::idle(), queue.clone());
        assert!(matches!(second, Err(ChannelError::AlreadyRunning)));

        first.stop();
        let third = RawInputChannel::start_with(ScriptedSource::idle(), queue);
        assert!(third.is_ok());
    }

    #[test]
    fn drop_releases_singleton() {
        let _guard = serial();
        let queue = PendingKeyQueue::new();
        let channel = RawInputChannel::start_with(ScriptedSource::idle(), queue.clone()).unwrap();
        drop(channel);
        assert!(RawInputChannel::start_with(ScriptedSource::idle(), queue).is_ok());
    }

    #[test]
    fn eof_ends_loop() {
        let _guard = serial();
        let queue = PendingKeyQueue::new();
        let source = ScriptedSource::new([Step::Data(b"x"), Step::Eof, Step::Data(b"y")]);
        let channel = RawInputChannel::start_with(source, queue.clone()).unwrap();

        assert!(wait_until(|| !channel.is_running()));
        assert_eq!(queue.drain(), vec![seq(b"x")]);
    }

    #[test]
    fn read_error_ends_loop() {
        let _guard = serial();
        let queue = PendingKeyQueue::new();
        let source = ScriptedSource::new([Step::Fail, Step::Data(b"y")]);
        let channel = RawInputChannel::start_with(source, queue.clone()).unwrap();

        assert!(wait_until(|| !channel.is_running()));
        assert!(queue.is_empty());
    }

    #[test]
    fn stop_is_idempotent() {
        let _guard = serial();
        let queue = PendingKeyQueue::new();
        let mut channel = RawInputChannel::start_with(ScriptedSource::idle(), queue).unwrap();
        assert!(channel.is_running());
        channel.stop();
        channel.stop();
        assert!(!channel.is_running());
    }

    #[test]
    fn scripted_channel_leaves_terminal_alone() {
        let _guard = serial();
        let channel = RawInputChannel::start_with(ScriptedSource::idle(), PendingKeyQueue::new()).unwrap();
        assert!(!channel.owns_raw_mode());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ChannelError::AlreadyRunning.to_string(),
            "raw input channel is already running"
        );
    }
}
