// SPDX-License-Identifier: MIT
//
// jot-term: terminal plumbing for the jot editor.
//
// `ansi` holds the escape sequences a full-screen repaint needs. `terminal`
// owns the scoped raw-mode guard, which restores the terminal on every exit
// path including panics. `keys` defines the key and line sources the driver
// reads through, so tests can replay input without a TTY.
//
// No TUI framework: the terminal is driven directly through termios and
// escape sequences.

pub mod ansi;
pub mod keys;
pub mod terminal;
