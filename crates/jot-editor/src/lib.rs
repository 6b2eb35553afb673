//! # jot-editor: Editor core for jot
//!
//! Everything here is terminal-agnostic and testable without a TTY:
//!
//! - **[`buffer`]**: `Buffer` wrapping a rope with a char-offset cursor, file I/O and search
//! - **[`history`]**: snapshot-based undo/redo stacks
//! - **[`clipboard`]**: single-slot copy, cut and paste
//! - **[`options`]**: session options and their `name=value` parser
//! - **[`session`]**: `EditSession`, the command surface the driver calls
//! - **[`error`]**: `EditError`, the crate's error type
//!
//! The session is the only type the binary needs; the others are public so
//! they can be tested and reused on their own.

pub mod buffer;
pub mod clipboard;
pub mod error;
pub mod history;
pub mod options;
pub mod session;

pub use error::{EditError, EditResult};
pub use options::Options;
pub use session::{EditSession, Outcome};
