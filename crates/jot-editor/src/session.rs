//! Edit session: the command surface the interactive driver talks to.
//!
//! An [`EditSession`] owns exactly one [`Buffer`], one [`History`] and one
//! [`Clipboard`], plus the [`Options`] it was created with and the path of
//! the open document. Every user command is a method here, and every
//! method leaves the session consistent even when its input is bad.
//!
//! # Recording
//!
//! Commands that change content (insert, delete, cut, paste) snapshot the
//! buffer first and hand that snapshot to the history only once the change
//! has actually happened. A command that turns out to change nothing
//! (deleting at offset 0, pasting an empty clipboard, cutting at the end)
//! records nothing and leaves the redo stack alone. Navigation, copy,
//! search, undo and redo never record.
//!
//! # Results
//!
//! Every command returns an [`Outcome`]; its `Display` is the message the
//! driver shows on the status line. Only `load` and `save` can fail, with
//! an [`EditError`], and a failure leaves the session untouched.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::buffer::{Buffer, LoadStatus};
use crate::clipboard::Clipboard;
use crate::error::{EditError, EditResult};
use crate::history::{History, Snapshot};
use crate::options::Options;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What a command did. `Display` renders the status-line message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file was read.
    Loaded { chars: usize },
    /// The file did not exist; the session starts with an empty buffer.
    Created,
    /// The buffer was written.
    Saved { chars: usize },
    /// Text was inserted; the cursor sits after it.
    Inserted { cursor: usize },
    /// The char before the cursor was removed.
    Deleted { cursor: usize },
    /// The cursor moved (or stayed put at a boundary).
    Moved { cursor: usize },
    Undone { cursor: usize },
    Redone { cursor: usize },
    NothingToUndo,
    NothingToRedo,
    /// Text copied into the clipboard.
    Copied(String),
    /// Text cut into the clipboard (may be empty at the end of the buffer).
    Cut(String),
    /// Clipboard text inserted; the cursor sits after it.
    Pasted { text: String, cursor: usize },
    /// First match of a search.
    Found { offset: usize },
    NotFound,
    /// Search-next with no earlier search term.
    NoPreviousSearch,
    /// The command was valid but had nothing to act on.
    Unchanged,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded { chars } => write!(f, "Read {chars} chars"),
            Self::Created => f.write_str("File not found. Creating a new file."),
            Self::Saved { chars } => write!(f, "File saved successfully ({chars} chars)."),
            Self::Inserted { cursor }
            | Self::Deleted { cursor }
            | Self::Moved { cursor } => write!(f, "Cursor at position: {cursor}"),
            Self::Undone { .. } => f.write_str("Undone"),
            Self::Redone { .. } => f.write_str("Redone"),
            Self::NothingToUndo => f.write_str("Nothing to undo"),
            Self::NothingToRedo => f.write_str("Nothing to redo"),
            Self::Copied(text) => write!(f, "Copied: {text}"),
            Self::Cut(text) => write!(f, "Cut: {text}"),
            Self::Pasted { text, .. } => write!(f, "Pasted: {text}"),
            Self::Found { offset } => write!(f, "Found at position: {offset}"),
            Self::NotFound => f.write_str("Not found."),
            Self::NoPreviousSearch => f.write_str("No previous search"),
            Self::Unchanged => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// EditSession
// ---------------------------------------------------------------------------

/// One open document and everything needed to edit it.
#[derive(Debug)]
pub struct EditSession {
    buffer: Buffer,
    history: History,
    clipboard: Clipboard,
    options: Options,
    path: Option<PathBuf>,
    last_search: Option<String>,
}

impl EditSession {
    /// Create a session with an empty, unnamed buffer.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            buffer: Buffer::new(),
            history: History::with_limit(options.history_limit()),
            clipboard: Clipboard::new(),
            options,
            path: None,
            last_search: None,
        }
    }

    /// Create an unnamed session holding `text`, cursor at 0.
    #[must_use]
    pub fn from_text(text: &str, options: Options) -> Self {
        let mut session = Self::new(options);
        session.buffer = Buffer::from_text(text);
        session
    }

    // -- Queries ------------------------------------------------------------

    /// The document buffer.
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// The full document text.
    #[must_use]
    pub fn contents(&self) -> String {
        self.buffer.contents()
    }

    /// Cursor position as a char offset.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    /// The undo/redo history.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// The clipboard.
    #[must_use]
    pub const fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Options the session was created with.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Path of the open document, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// True if the buffer changed since it was loaded or saved.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    // -- File commands ------------------------------------------------------

    /// Replace the session's document with the file at `path`.
    ///
    /// A missing file gives an empty buffer and [`Outcome::Created`]. The
    /// history is reset; the clipboard survives.
    ///
    /// # Errors
    ///
    /// [`EditError::Io`] if the file exists but can't be read,
    /// [`EditError::NotUtf8`] if it isn't text. The current document is kept.
    pub fn load(&mut self, path: impl AsRef<Path>) -> EditResult<Outcome> {
        let path = path.as_ref();
        let (buffer, status) = Buffer::load(path)?;
        self.buffer = buffer;
        self.history.clear();
        self.path = Some(path.to_path_buf());
        let outcome = match status {
            LoadStatus::Read => Outcome::Loaded {
                chars: self.buffer.len_chars(),
            },
            LoadStatus::Created => Outcome::Created,
        };
        info!(target: "session", path = %path.display(), ?outcome, "load");
        Ok(outcome)
    }

    /// Write the buffer to the session's path.
    ///
    /// # Errors
    ///
    /// [`EditError::NoPath`] if nothing was loaded, [`EditError::Io`] if the
    /// write fails.
    pub fn save(&mut self) -> EditResult<Outcome> {
        let path = self.path.clone().ok_or(EditError::NoPath)?;
        self.save_as(path)
    }

    /// Write the buffer to `path` and make it the session's path.
    ///
    /// # Errors
    ///
    /// [`EditError::Io`] if the write fails; the session's path is then left
    /// unchanged.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> EditResult<Outcome> {
        let path = path.as_ref();
        if let Err(e) = self.buffer.save(path) {
            warn!(target: "session", error = %e, "save_failed");
            return Err(e);
        }
        self.path = Some(path.to_path_buf());
        info!(target: "session", path = %path.display(), "save");
        Ok(Outcome::Saved {
            chars: self.buffer.len_chars(),
        })
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `text` at the cursor.
    pub fn insert(&mut self, text: &str) -> Outcome {
        if text.is_empty() {
            return Outcome::Unchanged;
        }
        let before = self.buffer.snapshot();
        match self.buffer.insert_at(self.buffer.cursor(), text) {
            Ok(cursor) => {
                self.record(before);
                Outcome::Inserted { cursor }
            }
            Err(e) => {
                warn!(target: "session", error = %e, "insert_rejected");
                Outcome::Unchanged
            }
        }
    }

    /// Delete the char before the cursor. A no-op at offset 0.
    pub fn delete_back(&mut self) -> Outcome {
        let cursor = self.buffer.cursor();
        if cursor == 0 {
            return Outcome::Unchanged;
        }
        let before = self.buffer.snapshot();
        self.buffer.delete_range(cursor - 1, 1);
        self.record(before);
        Outcome::Deleted {
            cursor: self.buffer.cursor(),
        }
    }

    /// Move the cursor one char left, stopping at 0.
    pub fn move_left(&mut self) -> Outcome {
        Outcome::Moved {
            cursor: self.buffer.move_cursor(-1),
        }
    }

    /// Move the cursor one char right, stopping at the end.
    pub fn move_right(&mut self) -> Outcome {
        Outcome::Moved {
            cursor: self.buffer.move_cursor(1),
        }
    }

    // -- History ------------------------------------------------------------

    /// Restore the state before the last edit.
    pub fn undo(&mut self) -> Outcome {
        match self.history.undo(self.buffer.snapshot()) {
            Some(prev) => {
                self.buffer.restore(prev);
                debug!(target: "session", cursor = self.buffer.cursor(), "undo");
                Outcome::Undone {
                    cursor: self.buffer.cursor(),
                }
            }
            None => Outcome::NothingToUndo,
        }
    }

    /// Re-apply the last undone edit.
    pub fn redo(&mut self) -> Outcome {
        match self.history.redo(self.buffer.snapshot()) {
            Some(next) => {
                self.buffer.restore(next);
                debug!(target: "session", cursor = self.buffer.cursor(), "redo");
                Outcome::Redone {
                    cursor: self.buffer.cursor(),
                }
            }
            None => Outcome::NothingToRedo,
        }
    }

    // -- Clipboard ----------------------------------------------------------

    /// Copy `selection_len` chars at the cursor.
    pub fn copy(&mut self) -> Outcome {
        let text = self
            .clipboard
            .copy(&self.buffer, self.buffer.cursor(), self.options.selection_len());
        Outcome::Copied(text.to_string())
    }

    /// Cut `selection_len` chars at the cursor.
    pub fn cut(&mut self) -> Outcome {
        let before = self.buffer.snapshot();
        let cursor = self.buffer.cursor();
        let text = self
            .clipboard
            .cut(&mut self.buffer, cursor, self.options.selection_len())
            .to_string();
        if !text.is_empty() {
            self.record(before);
        }
        Outcome::Cut(text)
    }

    /// Insert the clipboard at the cursor.
    pub fn paste(&mut self) -> Outcome {
        let before = self.buffer.snapshot();
        match self.clipboard.paste(&mut self.buffer, before.cursor()) {
            Ok(Some(cursor)) => {
                self.record(before);
                Outcome::Pasted {
                    text: self.clipboard.content().to_string(),
                    cursor,
                }
            }
            Ok(None) => Outcome::Unchanged,
            Err(e) => {
                warn!(target: "session", error = %e, "paste_rejected");
                Outcome::Unchanged
            }
        }
    }

    // -- Search -------------------------------------------------------------

    /// Find the first occurrence of `term`. The cursor does not move; the
    /// term is remembered for [`search_next`](Self::search_next).
    pub fn search(&mut self, term: &str) -> Outcome {
        self.last_search = Some(term.to_string());
        match self.buffer.find(term) {
            Some(offset) => Outcome::Found { offset },
            None => Outcome::NotFound,
        }
    }

    /// Jump to the next occurrence of the last search term after the
    /// cursor, wrapping to the start of the buffer.
    pub fn search_next(&mut self) -> Outcome {
        let Some(term) = self.last_search.as_deref() else {
            return Outcome::NoPreviousSearch;
        };
        let from = self.buffer.cursor() + 1;
        match self
            .buffer
            .find_from(term, from)
            .or_else(|| self.buffer.find(term))
        {
            Some(offset) => {
                self.buffer.set_cursor(offset);
                Outcome::Found { offset }
            }
            None => Outcome::NotFound,
        }
    }

    // -- Internals ----------------------------------------------------------

    fn record(&mut self, before: Snapshot) {
        self.history.record_before(before);
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn session(text: &str) -> EditSession {
        EditSession::from_text(text, Options::default())
    }

    // -- Scenarios ----------------------------------------------------------

    #[test]
    fn scenario_new_file_insert_undo_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.txt");
        let mut s = EditSession::default();

        assert_eq!(s.load(&path).unwrap(), Outcome::Created);
        assert_eq!(s.contents(), "");

        assert_eq!(s.insert("hello"), Outcome::Inserted { cursor: 5 });
        assert_eq!(s.contents(), "hello");

        assert_eq!(s.undo(), Outcome::Undone { cursor: 0 });
        assert_eq!(s.contents(), "");

        s.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        s.redo();
        s.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn scenario_copy_move_paste_splice_point() {
        let mut s = session("hello world");
        assert_eq!(s.copy(), Outcome::Copied("hello".into()));
        assert_eq!(s.clipboard().content(), "hello");

        for _ in 0..6 {
            s.move_right();
        }
        assert_eq!(s.cursor(), 6);

        assert_eq!(
            s.paste(),
            Outcome::Pasted {
                text: "hello".into(),
                cursor: 11
            }
        );
        assert_eq!(s.contents(), "hello helloworld");
    }

    #[test]
    fn scenario_search() {
        let mut s = session("hello world");
        assert_eq!(s.search("world"), Outcome::Found { offset: 6 });
        assert_eq!(s.search("xyz"), Outcome::NotFound);
        assert_eq!(s.cursor(), 0);
    }

    // -- Load / save --------------------------------------------------------

    #[test]
    fn load_existing_file_resets_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "abc").unwrap();

        let mut s = session("old");
        s.insert("x");
        assert_eq!(s.load(&path).unwrap(), Outcome::Loaded { chars: 4 });
        assert_eq!(s.contents(), "abc\n");
        assert!(!s.history().can_undo());
        assert!(!s.is_modified());
        assert_eq!(s.path(), Some(path.as_path()));
    }

    #[test]
    fn load_failure_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session("keep me");
        assert!(s.load(dir.path()).is_err());
        assert_eq!(s.contents(), "keep me");
        assert_eq!(s.path(), None);
    }

    #[test]
    fn save_without_path_fails() {
        let mut s = session("abc");
        assert!(matches!(s.save(), Err(EditError::NoPath)));
    }

    #[test]
    fn save_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("missing").join("f.txt");
        let mut s = session("abc");
        s.insert("x");

        assert!(matches!(s.save_as(&bad), Err(EditError::Io { .. })));
        assert_eq!(s.contents(), "xabc");
        assert!(s.is_modified());
        assert_eq!(s.path(), None);

        // Still usable afterwards.
        assert_eq!(s.undo(), Outcome::Undone { cursor: 0 });
    }

    #[test]
    fn save_as_sets_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let mut s = session("abc");
        assert_eq!(s.save_as(&path).unwrap(), Outcome::Saved { chars: 3 });
        assert_eq!(s.path(), Some(path.as_path()));
        s.insert("z");
        s.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "zabc");
    }

    // -- Insert / delete ----------------------------------------------------

    #[test]
    fn insert_empty_records_nothing() {
        let mut s = session("abc");
        assert_eq!(s.insert(""), Outcome::Unchanged);
        assert!(!s.history().can_undo());
    }

    #[test]
    fn delete_back_at_start_is_noop() {
        let mut s = session("abc");
        assert_eq!(s.delete_back(), Outcome::Unchanged);
        assert_eq!(s.contents(), "abc");
        assert!(!s.history().can_undo());
    }

    #[test]
    fn delete_back_removes_previous_char() {
        let mut s = session("abc");
        s.move_right();
        s.move_right();
        assert_eq!(s.delete_back(), Outcome::Deleted { cursor: 1 });
        assert_eq!(s.contents(), "ac");
    }

    // -- Undo / redo --------------------------------------------------------

    #[test]
    fn undo_then_redo_each_mutation() {
        type Cmd = fn(&mut EditSession) -> Outcome;
        let commands: [(&str, Cmd); 4] = [
            ("insert", |s| s.insert("XY")),
            ("delete", EditSession::delete_back),
            ("cut", EditSession::cut),
            ("paste", EditSession::paste),
        ];

        for (name, cmd) in commands {
            let mut s = session("hello world");
            s.move_right();
            s.move_right();
            s.copy();
            let before = s.contents();
            cmd(&mut s);
            let after = s.contents();
            assert_ne!(before, after, "{name} should change content");

            s.undo();
            assert_eq!(s.contents(), before, "undo {name}");
            assert_eq!(s.cursor(), 2, "undo {name} restores cursor");

            s.redo();
            assert_eq!(s.contents(), after, "redo {name}");
        }
    }

    #[test]
    fn new_mutation_after_undo_clears_redo() {
        let mut s = session("");
        s.insert("a");
        s.insert("b");
        s.undo();
        assert!(s.history().can_redo());

        s.insert("c");
        assert_eq!(s.redo(), Outcome::NothingToRedo);
        assert_eq!(s.contents(), "ac");
    }

    #[test]
    fn noop_after_undo_keeps_redo() {
        let mut s = session("");
        s.insert("a");
        s.undo();
        s.delete_back();
        s.paste();
        assert_eq!(s.redo(), Outcome::Redone { cursor: 1 });
    }

    #[test]
    fn nothing_to_undo_or_redo() {
        let mut s = session("abc");
        assert_eq!(s.undo(), Outcome::NothingToUndo);
        assert_eq!(s.redo(), Outcome::NothingToRedo);
        assert_eq!(s.contents(), "abc");
    }

    #[test]
    fn navigation_copy_and_search_do_not_record() {
        let mut s = session("abc abc");
        s.move_right();
        s.move_left();
        s.copy();
        s.search("abc");
        s.search_next();
        assert!(!s.history().can_undo());
    }

    #[test]
    fn history_limit_from_options() {
        let opts = Options::new().with_history_limit(Some(1));
        let mut s = EditSession::from_text("", opts);
        s.insert("a");
        s.insert("b");
        s.undo();
        assert_eq!(s.undo(), Outcome::NothingToUndo);
        assert_eq!(s.contents(), "a");
    }

    // -- Clipboard ----------------------------------------------------------

    #[test]
    fn cut_then_paste_restores_original() {
        let mut s = session("hello world");
        for _ in 0..3 {
            s.move_right();
        }
        assert_eq!(s.cut(), Outcome::Cut("lo wo".into()));
        assert_eq!(s.contents(), "helrld");
        s.paste();
        assert_eq!(s.contents(), "hello world");
    }

    #[test]
    fn cut_at_end_records_nothing() {
        let mut s = session("ab");
        s.move_right();
        s.move_right();
        assert_eq!(s.cut(), Outcome::Cut(String::new()));
        assert!(!s.history().can_undo());
        assert!(s.clipboard().is_empty());
    }

    #[test]
    fn paste_empty_is_unchanged() {
        let mut s = session("ab");
        assert_eq!(s.paste(), Outcome::Unchanged);
        assert!(!s.history().can_undo());
    }

    #[test]
    fn selection_len_from_options() {
        let mut s = EditSession::from_text("hello world", Options::new().with_selection_len(2));
        assert_eq!(s.copy(), Outcome::Copied("he".into()));
    }

    // -- Cursor -------------------------------------------------------------

    #[test]
    fn cursor_never_leaves_bounds() {
        let mut s = session("hey");
        for step in 0..20 {
            if step % 3 == 0 {
                s.move_left();
            } else {
                s.move_right();
            }
            assert!(s.cursor() <= s.buffer().len_chars());
        }
        for _ in 0..10 {
            s.move_left();
        }
        assert_eq!(s.cursor(), 0);
    }

    // -- Search next --------------------------------------------------------

    #[test]
    fn search_next_moves_and_wraps() {
        let mut s = session("ab ab ab");
        assert_eq!(s.search_next(), Outcome::NoPreviousSearch);

        s.search("ab");
        assert_eq!(s.search_next(), Outcome::Found { offset: 3 });
        assert_eq!(s.search_next(), Outcome::Found { offset: 6 });
        assert_eq!(s.search_next(), Outcome::Found { offset: 0 });
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn search_next_not_found() {
        let mut s = session("abc");
        s.search("zz");
        assert_eq!(s.search_next(), Outcome::NotFound);
        assert_eq!(s.cursor(), 0);
    }

    // -- Outcome ------------------------------------------------------------

    #[test]
    fn outcome_messages() {
        assert_eq!(Outcome::Created.to_string(), "File not found. Creating a new file.");
        assert_eq!(Outcome::Found { offset: 6 }.to_string(), "Found at position: 6");
        assert_eq!(Outcome::NotFound.to_string(), "Not found.");
        assert_eq!(Outcome::Copied("hi".into()).to_string(), "Copied: hi");
        assert_eq!(Outcome::NothingToUndo.to_string(), "Nothing to undo");
        assert_eq!(Outcome::Unchanged.to_string(), "");
    }
}
