// SPDX-License-Identifier: MIT
//
// Key and line input.
//
// The driver never touches stdin directly. It asks a `KeySource` for the
// next command key and a `LineSource` for prompt answers (insert text,
// search term, file name). The terminal implementations read stdin; the
// scripted ones replay a fixed input so the whole dispatch loop can run in
// tests without a TTY.
//
// Command keys are single bytes read under a `RawMode` guard that is
// dropped as soon as the byte arrives, so prompts that follow get the
// normal line-buffered, echoing terminal back.

use std::collections::VecDeque;
use std::io::{self, BufRead, Read};

use tracing::trace;

use crate::terminal::RawMode;

// ─── Key ────────────────────────────────────────────────────────────────────

/// One command keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable or control character with no special meaning.
    Char(char),
    /// `\n` or `\r`.
    Enter,
    /// `ESC` (0x1b).
    Esc,
    /// DEL (0x7f) or BS (0x08).
    Backspace,
    /// Ctrl-C (0x03), delivered as a byte because raw mode disables signals.
    Interrupt,
    /// A byte outside ASCII, e.g. the first byte of a UTF-8 sequence.
    Byte(u8),
}

impl Key {
    /// Classify a single byte read from the terminal.
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        if byte.is_ascii() {
            Self::from_char(char::from(byte))
        } else {
            Self::Byte(byte)
        }
    }

    /// Classify a character.
    #[must_use]
    pub const fn from_char(c: char) -> Self {
        match c {
            '\n' | '\r' => Self::Enter,
            '\x1b' => Self::Esc,
            '\x7f' | '\x08' => Self::Backspace,
            '\x03' => Self::Interrupt,
            other => Self::Char(other),
        }
    }

    /// The character for a [`Key::Char`], `None` for everything else.
    #[must_use]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            _ => None,
        }
    }
}

// ─── Sources ────────────────────────────────────────────────────────────────

/// Where command keys come from.
pub trait KeySource {
    /// Block until the next key. `Ok(None)` means input is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying input.
    fn next_key(&mut self) -> io::Result<Option<Key>>;
}

/// Where prompt answers come from.
pub trait LineSource {
    /// Block until a full line is available and return it without the
    /// trailing line terminator. `Ok(None)` means input is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Keys read from stdin, one byte at a time, each under its own
/// [`RawMode`] guard.
#[derive(Debug, Default)]
pub struct TerminalKeys;

impl TerminalKeys {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        let _raw = RawMode::enable()?;
        let mut byte = [0u8; 1];
        loop {
            match io::stdin().lock().read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    let key = Key::from_byte(byte[0]);
                    trace!(target: "keys", ?key, "key");
                    return Ok(Some(key));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

/// Lines read from stdin in the normal (canonical, echoing) mode.
#[derive(Debug, Default)]
pub struct TerminalLines;

impl TerminalLines {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LineSource for TerminalLines {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_end(line)))
    }
}

fn strip_line_end(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

// ─── Scripted ───────────────────────────────────────────────────────────────

/// Keys replayed from a string, one char per key.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Key>,
}

impl ScriptedKeys {
    #[must_use]
    pub fn new(script: &str) -> Self {
        Self {
            keys: script.chars().map(Key::from_char).collect(),
        }
    }

    /// Keys not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        Ok(self.keys.pop_front())
    }
}

/// Lines replayed from a list.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedLines {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
