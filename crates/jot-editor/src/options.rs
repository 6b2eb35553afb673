//! Editor options: the session's tunable knobs and their `name=value`
//! parsing layer.
//!
//! Options are fixed for the lifetime of a session. The driver builds them
//! from defaults plus any `name=value` words given after the file name on
//! the command line. A `name?` word prints the value in effect at that
//! point.
//!
//! # Option names
//!
//! Both full names and abbreviations are accepted:
//!
//! | Full name      | Abbrev | Type    | Default | Meaning                                  |
//! |----------------|--------|---------|---------|------------------------------------------|
//! | `selectionlen` | `sel`  | integer | 5       | chars taken by copy and cut (min 1)      |
//! | `undolevels`   | `ul`   | integer | 0       | undo depth; 0 keeps every edit           |

use std::fmt;

use thiserror::Error;

/// Chars copied or cut when nothing else is configured.
pub const DEFAULT_SELECTION_LEN: usize = 5;

// ---------------------------------------------------------------------------
// Directive parsing
// ---------------------------------------------------------------------------

/// A parsed option argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `option?` or a bare `option`: report the current value.
    Query(String),

    /// `option=value`: assign a value.
    Assign(String, String),
}

/// Parse a single argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    let name = arg.strip_suffix('?').unwrap_or(arg);
    SetDirective::Query(name.to_string())
}

/// Errors from applying a directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Session options. See the module docs for names and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    selection_len: usize,
    history_limit: Option<usize>,
}

impl Options {
    /// Default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selection_len: DEFAULT_SELECTION_LEN,
            history_limit: None,
        }
    }

    /// Set the copy/cut span length. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_selection_len(mut self, len: usize) -> Self {
        self.selection_len = len.max(1);
        self
    }

    /// Cap the undo stack. `None` or `Some(0)` keep every edit.
    #[must_use]
    pub const fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = match limit {
            Some(0) => None,
            other => other,
        };
        self
    }

    /// Chars taken by copy and cut.
    #[must_use]
    pub const fn selection_len(&self) -> usize {
        self.selection_len
    }

    /// Maximum undo depth, if bounded.
    #[must_use]
    pub const fn history_limit(&self) -> Option<usize> {
        self.history_limit
    }

    /// Apply one directive. Queries return the formatted value; assignments
    /// return `None`.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] for an unrecognized name,
    /// [`OptionError::InvalidValue`] if the value is not a valid integer for
    /// that option.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::Query(name) => match name.as_str() {
                "selectionlen" | "sel" => Ok(Some(format!("selectionlen={}", self.selection_len))),
                "undolevels" | "ul" => Ok(Some(format!(
                    "undolevels={}",
                    self.history_limit.unwrap_or(0)
                ))),
                _ => Err(OptionError::Unknown(name.clone())),
            },
            SetDirective::Assign(name, value) => {
                let invalid = || OptionError::InvalidValue {
                    name: name.clone(),
                    value: value.clone(),
                };
                match name.as_str() {
                    "selectionlen" | "sel" => {
                        let n: usize = value.parse().map_err(|_| invalid())?;
                        if n == 0 {
                            return Err(invalid());
                        }
                        self.selection_len = n;
                    }
                    "undolevels" | "ul" => {
                        let n: usize = value.parse().map_err(|_| invalid())?;
                        *self = self.with_history_limit(Some(n));
                    }
                    _ => return Err(OptionError::Unknown(name.clone())),
                }
                Ok(None)
            }
        }
    }

    /// Parse and apply every argument in `args`, stopping at the first error.
    /// Returns the answers to any queries, in order.
    ///
    /// # Errors
    ///
    /// The first [`OptionError`] encountered. Earlier arguments stay applied.
    pub fn apply_all<'a>(
        &mut self,
        args: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<String>, OptionError> {
        let mut answers = Vec::new();
        for arg in args {
            if let Some(answer) = self.apply(&parse_set_arg(arg))? {
                answers.push(answer);
            }
        }
        Ok(answers)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selectionlen={} undolevels={}",
            self.selection_len,
            self.history_limit.unwrap_or(0)
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_set_arg ─────────────────────────────────────────────────────

    #[test]
    fn parse_assign() {
        assert_eq!(
            parse_set_arg("selectionlen=8"),
            SetDirective::Assign("selectionlen".into(), "8".into())
        );
        assert_eq!(
            parse_set_arg("ul=100"),
            SetDirective::Assign("ul".into(), "100".into())
        );
    }

    #[test]
    fn parse_query() {
        assert_eq!(parse_set_arg("sel?"), SetDirective::Query("sel".into()));
        assert_eq!(parse_set_arg("sel"), SetDirective::Query("sel".into()));
    }

    // ── Defaults / builders ──────────────────────────────────────────────

    #[test]
    fn defaults() {
        let o = Options::default();
        assert_eq!(o.selection_len(), 5);
        assert_eq!(o.history_limit(), None);
    }

    #[test]
    fn builder_clamps_selection_len() {
        assert_eq!(Options::new().with_selection_len(0).selection_len(), 1);
    }

    #[test]
    fn builder_zero_limit_is_unbounded() {
        assert_eq!(Options::new().with_history_limit(Some(0)).history_limit(), None);
        assert_eq!(Options::new().with_history_limit(Some(7)).history_limit(), Some(7));
    }

    // ── apply ────────────────────────────────────────────────────────────

    #[test]
    fn apply_assign_full_and_abbrev() {
        let mut o = Options::new();
        o.apply_all(["selectionlen=10", "ul=50"]).unwrap();
        assert_eq!(o.selection_len(), 10);
        assert_eq!(o.history_limit(), Some(50));

        o.apply_all(["sel=2", "undolevels=0"]).unwrap();
        assert_eq!(o.selection_len(), 2);
        assert_eq!(o.history_limit(), None);
    }

    #[test]
    fn apply_query() {
        let mut o = Options::new();
        assert_eq!(
            o.apply(&parse_set_arg("sel?")).unwrap(),
            Some("selectionlen=5".to_string())
        );
        assert_eq!(
            o.apply(&parse_set_arg("ul")).unwrap(),
            Some("undolevels=0".to_string())
        );
    }

    #[test]
    fn apply_unknown() {
        let mut o = Options::new();
        assert_eq!(
            o.apply(&parse_set_arg("tabstop=4")),
            Err(OptionError::Unknown("tabstop".into()))
        );
    }

    #[test]
    fn apply_invalid_value() {
        let mut o = Options::new();
        let err = o.apply(&parse_set_arg("sel=abc")).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for sel: abc");
        assert!(o.apply(&parse_set_arg("sel=0")).is_err());
        assert!(o.apply(&parse_set_arg("ul=-1")).is_err());
        assert_eq!(o, Options::new());
    }

    #[test]
    fn apply_all_collects_query_answers() {
        let mut o = Options::new();
        let answers = o.apply_all(["sel=7", "sel?", "ul=0", "ul?"]).unwrap();
        assert_eq!(answers, vec!["selectionlen=7", "undolevels=0"]);
    }

    #[test]
    fn apply_all_stops_at_first_error() {
        let mut o = Options::new();
        let err = o.apply_all(["sel=9", "bogus=1", "ul=3"]).unwrap_err();
        assert_eq!(err, OptionError::Unknown("bogus".into()));
        assert_eq!(o.selection_len(), 9);
        assert_eq!(o.history_limit(), None);
    }

    #[test]
    fn display_lists_all() {
        let o = Options::new().with_selection_len(3).with_history_limit(Some(20));
        assert_eq!(o.to_string(), "selectionlen=3 undolevels=20");
    }
}
