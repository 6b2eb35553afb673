//! Clipboard: a single slot for copied and cut text.
//!
//! Copy and cut read a fixed-length span starting at an offset (the
//! session passes the cursor and [`Options::selection_len`]). Paste inserts
//! the slot at an offset and leaves the slot untouched, so the same text can
//! be pasted any number of times.
//!
//! The clipboard never records history itself. Cut and paste mutate the
//! buffer, so the session snapshots the buffer before calling them.
//!
//! [`Options::selection_len`]: crate::options::Options::selection_len

use crate::buffer::Buffer;
use crate::error::EditResult;

/// Single-slot clipboard. Empty until the first copy or cut.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: String,
}

impl Clipboard {
    /// Create an empty clipboard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: String::new(),
        }
    }

    /// Copy up to `length` chars at `offset` into the slot. The buffer is
    /// not modified. Returns the new slot content.
    pub fn copy(&mut self, buffer: &Buffer, offset: usize, length: usize) -> &str {
        self.slot = buffer.slice(offset, length);
        &self.slot
    }

    /// Like [`copy`](Self::copy), then remove the copied span from the
    /// buffer.
    pub fn cut(&mut self, buffer: &mut Buffer, offset: usize, length: usize) -> &str {
        self.slot = buffer.delete_range(offset, length);
        &self.slot
    }

    /// Insert the slot at `offset`. The cursor lands after the pasted text.
    ///
    /// Returns `Ok(None)` without touching the buffer when the slot is
    /// empty, otherwise the new cursor.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidOffset`](crate::error::EditError::InvalidOffset)
    /// if `offset` is past the end of the buffer.
    pub fn paste(&self, buffer: &mut Buffer, offset: usize) -> EditResult<Option<usize>> {
        if self.slot.is_empty() {
            return Ok(None);
        }
        buffer.insert_at(offset, &self.slot).map(Some)
    }

    /// The stored text. Empty if nothing has been copied.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.slot
    }

    /// True if there is nothing to paste.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.is_empty()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
