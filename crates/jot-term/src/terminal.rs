// SPDX-License-Identifier: MIT
//
// Terminal control: scoped raw mode and panic-safe cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), isatty, and raw fd writes. These are the standard POSIX
// interfaces for terminal control. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// The editor reads one key at a time and goes back to the normal
// line-buffered terminal for prompts, so raw mode only lasts as long as a
// `RawMode` guard lives. Line buffering, echo and signal generation are
// off while it does: Ctrl-C arrives as byte 0x03 instead of a SIGINT that
// would kill the process before the guard could restore anything. Output
// processing stays on.
//
// Dropping the guard restores the saved termios. A panic that unwinds past
// the guard still drops it, but a panic hook also restores from a global
// backup, so the terminal comes back even if the panic aborts or happens
// while the guard is leaked.

#[cfg(not(unix))]
use std::io::Write;
use std::fmt;
use std::io;
use std::sync::{Mutex, Once};

use tracing::trace;

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

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
///
/// [`RawMode`] owns its own copy, but the panic hook can't reach it. This
/// backup, behind a [`Mutex`], lets the hook restore the terminal without
/// the guard.
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

/// Reset attributes and show the cursor, in case the panic hit mid-paint.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h";

/// Ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this a panic while echo is off leaves the shell with no echo and
/// no line editing. The hook writes [`EMERGENCY_RESTORE`] directly to fd 1
/// (bypassing Rust's stdout lock so it can't deadlock), restores termios,
/// then delegates to the original hook so the message prints normally.
///
/// Called by [`RawMode::enable`]; the driver may also call it up front.
pub fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor.
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

/// Scoped single-key input mode.
///
/// While the guard lives, stdin delivers bytes as they are typed (no line
/// buffering), does not echo them and does not turn Ctrl-C into a signal.
/// Dropping the guard restores the
/// previous settings on every exit path.
///
/// When stdin is not a terminal the guard does nothing, so piped input and
/// tests work unchanged.
///
/// # Example
///
/// ```no_run
/// use jot_term::terminal::RawMode;
///
/// {
///     let _raw = RawMode::enable()?;
///     // read one byte ...
/// } // terminal restored here
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct RawMode {
    /// Settings saved on entry. `None` when stdin is not a TTY.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
}

impl RawMode {
    /// Clear `ICANON`, `ECHO`, `ISIG` and `IEXTEN` on stdin until the guard
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal settings can't be read or written.
    #[cfg(unix)]
    pub fn enable() -> io::Result<Self> {
        use std::os::unix::io::AsRawFd;

        install_panic_hook();

        if !is_tty() {
            return Ok(Self {
                original_termios: None,
            });
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            let original = termios;

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(original);
            }

            termios.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG | libc::IEXTEN);
            // VMIN=1, VTIME=0: read() blocks until one byte is available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSANOW, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            trace!(target: "terminal", "raw_mode_on");
            Ok(Self {
                original_termios: Some(original),
            })
        }
    }

    #[cfg(not(unix))]
    pub fn enable() -> io::Result<Self> {
        install_panic_hook();
        Ok(Self {})
    }

    /// True if the guard actually changed terminal settings.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        #[cfg(unix)]
        {
            self.original_termios.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    #[cfg(unix)]
    fn restore(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if let Some(ref original) = self.original_termios {
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSANOW, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
            trace!(target: "terminal", "raw_mode_off");
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn restore(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for RawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawMode")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
