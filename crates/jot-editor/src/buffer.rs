//! Text buffer: the document text plus the cursor.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and a single cursor expressed as a char
//! offset into it. Everything here works in char offsets: offset 3 of
//! `"café"` is `'é'`, never a byte in the middle of its UTF-8 encoding.
//!
//! # Design choices
//!
//! - **ropey** gives O(log n) insert/delete anywhere and, more importantly
//!   for the history, O(1) clones that share structure. A snapshot of a
//!   large document costs a pointer bump, not a copy.
//!
//! - **Out-of-range input never corrupts content.** Inserting past the end
//!   is rejected with [`EditError::InvalidOffset`]; deleting past the end is
//!   clamped; cursor movement saturates at both ends.
//!
//! - **Load normalizes line endings the way line-by-line reading does.** Each
//!   line read gets a `\n` appended, so a file without a trailing newline
//!   gains one. Saving writes content verbatim.
//!
//! - **No undo here.** History is a separate concern that takes
//!   [`Snapshot`]s of the buffer before each mutation.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use ropey::Rope;
use tracing::{debug, trace};

use crate::error::{EditError, EditResult};
use crate::history::Snapshot;

// ---------------------------------------------------------------------------
// LoadStatus
// ---------------------------------------------------------------------------

/// How [`Buffer::load`] obtained its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The file existed and was read.
    Read,
    /// The file does not exist; the buffer starts empty.
    Created,
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// Document text and cursor.
///
/// Invariant: `cursor <= len_chars()` after every public method returns.
pub struct Buffer {
    rope: Rope,
    cursor: usize,
    modified: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with the cursor at 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            cursor: 0,
            modified: false,
        }
    }

    /// Create a buffer holding `text` verbatim, cursor at 0.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: 0,
            modified: false,
        }
    }

    /// Load a buffer from a file.
    ///
    /// Every line read gets a trailing `\n`. Lines are split on `\n` only, so
    /// a `\r` before it stays part of the line. A missing file is not an
    /// error: the buffer starts empty and the status is
    /// [`LoadStatus::Created`].
    ///
    /// # Errors
    ///
    /// [`EditError::NotUtf8`] if the file holds invalid UTF-8,
    /// [`EditError::Io`] if it exists but cannot be read.
    pub fn load(path: &Path) -> EditResult<(Self, LoadStatus)> {
        match fs::read_to_string(path) {
            Ok(raw) => {
                let text = append_newline_per_line(&raw);
                debug!(target: "buffer", path = %path.display(), bytes = raw.len(), "load_ok");
                Ok((Self::from_text(&text), LoadStatus::Read))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(target: "buffer", path = %path.display(), "load_not_found");
                Ok((Self::new(), LoadStatus::Created))
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                debug!(target: "buffer", path = %path.display(), "load_not_utf8");
                Err(EditError::NotUtf8 {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => Err(EditError::io(path, e)),
        }
    }

    // -- Text access --------------------------------------------------------

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Collect all text into a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Up to `count` chars starting at `offset`, clamped to the buffer.
    #[must_use]
    pub fn slice(&self, offset: usize, count: usize) -> String {
        let (start, end) = self.clamp_span(offset, count);
        self.rope.slice(start..end).to_string()
    }

    /// Char offset of the first occurrence of `term`. Case-sensitive.
    ///
    /// An empty term matches at offset 0.
    #[must_use]
    pub fn find(&self, term: &str) -> Option<usize> {
        self.find_from(term, 0)
    }

    /// Char offset of the first occurrence of `term` at or after `from`.
    ///
    /// Returns `None` when `from` lies past the end of the buffer.
    #[must_use]
    pub fn find_from(&self, term: &str, from: usize) -> Option<usize> {
        if from > self.len_chars() {
            return None;
        }
        let haystack = self.rope.slice(from..).to_string();
        haystack
            .find(term)
            .map(|byte| from + haystack[..byte].chars().count())
    }

    // -- Cursor -------------------------------------------------------------

    /// Cursor position as a char offset.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor by `delta` chars, saturating at `0` and `len_chars()`.
    /// Returns the new cursor.
    pub fn move_cursor(&mut self, delta: isize) -> usize {
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.len_chars());
        self.cursor
    }

    /// Place the cursor at `offset`, clamped to the buffer.
    pub fn set_cursor(&mut self, offset: usize) -> usize {
        self.cursor = offset.min(self.len_chars());
        self.cursor
    }

    /// The cursor as a 0-indexed `(line, col)` pair, for display.
    #[must_use]
    pub fn line_col(&self) -> (usize, usize) {
        let line = self.rope.char_to_line(self.cursor);
        (line, self.cursor - self.rope.line_to_char(line))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at `offset` and place the cursor just after it.
    /// Returns the new cursor.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidOffset`] if `offset > len_chars()`. The buffer is
    /// left untouched.
    pub fn insert_at(&mut self, offset: usize, text: &str) -> EditResult<usize> {
        let len = self.len_chars();
        if offset > len {
            return Err(EditError::InvalidOffset { offset, len });
        }
        self.rope.insert(offset, text);
        self.cursor = offset + text.chars().count();
        if !text.is_empty() {
            self.modified = true;
        }
        trace!(target: "buffer", offset, chars = self.cursor - offset, "insert");
        Ok(self.cursor)
    }

    /// Remove up to `count` chars starting at `offset` and return them.
    ///
    /// The span is clamped to the buffer; a span entirely past the end
    /// removes nothing. A cursor inside the removed span moves to its start,
    /// a cursor after it shifts left by the removed length.
    pub fn delete_range(&mut self, offset: usize, count: usize) -> String {
        let (start, end) = self.clamp_span(offset, count);
        if start == end {
            return String::new();
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);

        if self.cursor >= end {
            self.cursor -= end - start;
        } else if self.cursor > start {
            self.cursor = start;
        }
        self.modified = true;
        trace!(target: "buffer", start, end, "delete");
        removed
    }

    // -- Snapshots ----------------------------------------------------------

    /// Capture content and cursor. Cheap: the rope clone shares structure.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.rope.clone(), self.cursor)
    }

    /// Replace content and cursor with a snapshot's.
    pub fn restore(&mut self, snapshot: Snapshot) {
        let (rope, cursor) = snapshot.into_parts();
        self.rope = rope;
        self.cursor = cursor.min(self.rope.len_chars());
        self.modified = true;
    }

    // -- Metadata -----------------------------------------------------------

    /// True if the buffer changed since it was created, loaded or saved.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    // -- File I/O -----------------------------------------------------------

    /// Write the content verbatim to `path` and mark the buffer unmodified.
    ///
    /// # Errors
    ///
    /// [`EditError::Io`] if the write fails. The buffer stays modified.
    pub fn save(&mut self, path: &Path) -> EditResult<()> {
        let mut file = fs::File::create(path).map_err(|e| EditError::io(path, e))?;
        self.rope
            .write_to(&mut file)
            .map_err(|e| EditError::io(path, e))?;
        self.modified = false;
        debug!(target: "buffer", path = %path.display(), chars = self.len_chars(), "save_ok");
        Ok(())
    }

    // -- Internals ----------------------------------------------------------

    fn clamp_span(&self, offset: usize, count: usize) -> (usize, usize) {
        let len = self.len_chars();
        let start = offset.min(len);
        (start, start.saturating_add(count).min(len))
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("chars", &self.len_chars())
            .field("cursor", &self.cursor)
            .field("modified", &self.modified)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rebuild `raw` as if read line by line, appending `\n` after each line.
fn append_newline_per_line(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len() + 1);
    for line in raw.split_terminator('\n') {
        text.push_str(line);
        text.push('\n');
    }
    text
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
