// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, termination signals, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), sigaction, isatty, and raw fd writes. These are the standard
// POSIX interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// The game runs inline on the normal screen (no alternate screen), so the
// only state we change is the termios line discipline. `RawMode` saves the
// original termios, switches to raw/no-echo, and restores on drop.
//
// Every exit path must hand the user back a cooked terminal:
//
//   - normal exit and `?` errors: the guard drops
//   - panics: a hook restores from a global termios backup, then
//     delegates to the original handler so the message is readable
//   - SIGTERM / SIGHUP / SIGINT: a handler sets a flag, the consumer loop
//     sees it and returns, and the guard drops as usual
//
// ISIG is cleared in raw mode, so Ctrl+C arrives as byte 0x03 rather than
// SIGINT. The SIGINT handler only matters for `kill -INT`.

use std::io;
#[cfg(not(unix))]
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use tracing::{debug, warn};

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Termination Signals ────────────────────────────────────────────────────

/// Set by the SIGTERM/SIGHUP/SIGINT handler. Checked by the consumer loop.
static TERMINATION_REQUESTED: AtomicBool = AtomicBool::new(false);

static SIGNAL_HANDLERS_INSTALLED: Once = Once::new();

/// Install handlers for SIGTERM, SIGHUP and SIGINT (once per process).
///
/// The handler only sets [`TERMINATION_REQUESTED`]; writing to an atomic is
/// async-signal-safe. No `SA_RESTART`, so a blocked `poll()` in the reader
/// thread returns early with `EINTR`.
#[cfg(unix)]
pub fn install_termination_handlers() {
    SIGNAL_HANDLERS_INSTALLED.call_once(|| unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = termination_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        for sig in [libc::SIGTERM, libc::SIGHUP, libc::SIGINT] {
            libc::sigaction(sig, &raw const sa, std::ptr::null_mut());
        }
    });
}

#[cfg(unix)]
extern "C" fn termination_handler(_sig: libc::c_int) {
    TERMINATION_REQUESTED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
pub fn install_termination_handlers() {
    SIGNAL_HANDLERS_INSTALLED.call_once(|| {});
}

/// Whether a termination signal has arrived since the last reset.
#[inline]
#[must_use]
pub fn termination_requested() -> bool {
    TERMINATION_REQUESTED.load(Ordering::Relaxed)
}

/// Set the termination flag by hand, so the consumer loop winds down
/// through the same path a signal takes.
pub fn request_termination() {
    TERMINATION_REQUESTED.store(true, Ordering::Relaxed);
}

/// Clear the termination flag.
pub fn reset_termination() {
    TERMINATION_REQUESTED.store(false, Ordering::Relaxed);
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
///
/// [`RawMode`] owns its own copy, but the panic hook can't reach it.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Restore sequence for emergency use: reset SGR, reset cursor shape, show
/// cursor, and start a fresh line so the panic message isn't glued to the
/// prompt.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[0m\
    \x1b[0 q\
    \x1b[?25h\
    \r\n";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            #[cfg(unix)]
            restore_termios_from_backup();

            emergency_restore();
            original(info);
        }));
    });
}

/// Write [`EMERGENCY_RESTORE`] straight to fd 1, bypassing the stdout lock.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Scoped raw/no-echo mode on stdin.
///
/// [`enter`](Self::enter) switches the line discipline; dropping the guard
/// restores the saved termios. When stdin is not a TTY (tests, pipes) the
/// guard is inert.
///
/// ```no_run
/// use bz_term::terminal::RawMode;
///
/// let raw = RawMode::enter()?;
/// // ... read keys ...
/// drop(raw); // cooked mode again
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RawMode {
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Switch stdin to raw mode and return the restoring guard.
    ///
    /// Also installs the panic hook (once per process).
    ///
    /// # Errors
    ///
    /// Returns the OS error if `tcgetattr` or `tcsetattr` fails.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        let mut guard = Self {
            #[cfg(unix)]
            original: None,
        };
        guard.enable()?;
        Ok(guard)
    }

    /// Whether this guard actually changed the terminal.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        #[cfg(unix)]
        {
            self.original.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Restore the saved termios now. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns the OS error if `tcsetattr` fails.
    pub fn restore(&mut self) -> io::Result<()> {
        #[cfg(unix)]
        if let Some(ref original) = self.original {
            unsafe {
                if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
                *backup = None;
            }
            self.original = None;
            debug!("terminal restored to cooked mode");
        }

        Ok(())
    }

    #[cfg(unix)]
    fn enable(&mut self) -> io::Result<()> {
        if !is_tty() {
            debug!("stdin is not a tty, raw mode skipped");
            return Ok(());
        }

        let fd = libc::STDIN_FILENO;

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original = Some(termios);
            if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
                *backup = Some(termios);
            }

            // cfmakeraw equivalent.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                let err = io::Error::last_os_error();
                self.original = None;
                if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
                    *backup = None;
                }
                return Err(err);
            }
        }

        debug!("terminal switched to raw mode");
        Ok(())
    }

    #[cfg(not(unix))]
    fn enable(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(%err, "failed to restore terminal mode");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_flag_set_and_reset() {
        request_termination();
        assert!(termination_requested());
        reset_termination();
        assert!(!termination_requested());
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    #[test]
    fn emergency_restore_is_valid_utf8() {
        std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
    }

    #[test]
    fn emergency_restore_shows_cursor_and_resets() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.contains("\x1b[0m"), "must reset SGR attributes");
        assert!(s.contains("\x1b[0 q"), "must reset cursor shape");
        assert!(s.contains("\x1b[?25h"), "must show cursor");
        assert!(s.ends_with("\r\n"));
    }

    #[test]
    fn raw_mode_enter_restore_cycle() {
        let mut raw = RawMode::enter().unwrap();
        raw.restore().unwrap();
        assert!(!raw.is_active());
    }

    #[test]
    fn raw_mode_restore_is_idempotent() {
        let mut raw = RawMode::enter().unwrap();
        raw.restore().unwrap();
        raw.restore().unwrap();
    }

    #[test]
    fn raw_mode_drop_does_not_panic() {
        let raw = RawMode::enter().unwrap();
        drop(raw);
    }

    #[test]
    fn install_termination_handlers_twice() {
        install_termination_handlers();
        install_termination_handlers();
    }
}
