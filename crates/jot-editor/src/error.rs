//! Error types for the editor core.
//!
//! Only a few things can really go wrong inside a session: the filesystem
//! refuses a read or write, a file holds bytes that are not UTF-8, or a
//! caller hands the buffer an offset past its end. Everything else (undo with an empty history, moving past the ends,
//! deleting at offset 0) is a no-op reported through
//! [`Outcome`](crate::session::Outcome), not an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by [`Buffer`](crate::buffer::Buffer) and
/// [`EditSession`](crate::session::EditSession).
#[derive(Debug, Error)]
pub enum EditError {
    /// Reading or writing the document failed. Never retried.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but its contents are not valid UTF-8.
    #[error("{}: not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },

    /// An insert offset lies past the end of the buffer.
    #[error("offset {offset} is past the end of the buffer (length {len})")]
    InvalidOffset { offset: usize, len: usize },

    /// `save` was called before any path was loaded or given.
    #[error("no file name")]
    NoPath,
}

impl EditError {
    /// Wrap an I/O error together with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the editor core.
pub type EditResult<T> = Result<T, EditError>;
