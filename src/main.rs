// SPDX-License-Identifier: MIT
//
// jot: a minimal single-key terminal text editor.
//
// This is the main binary that wires together the two crates:
//
//   jot-term   → raw mode per keypress, ANSI repaint, key and line sources
//   jot-editor → buffer, undo/redo history, clipboard, edit session
//
// Each keypress flows through:
//
//   KeySource → handle_key → EditSession command → Outcome → message
//   paint → clear screen → content → status line → message → help
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ document text                │
//   ├──────────────────────────────┤
//   │ status line (INVERSE)        │  ← name, dirty marker, cursor
//   ├──────────────────────────────┤
//   │ message line                 │  ← last command's outcome
//   │ key help                     │
//   └──────────────────────────────┘

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Once;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use jot_editor::{EditSession, Options, Outcome};
use jot_term::ansi;
use jot_term::keys::{Key, KeySource, LineSource, TerminalKeys, TerminalLines};
use jot_term::terminal;

/// Name of the log file created in the system temp directory.
const LOG_FILE: &str = "jot.log";

/// One-line key reference shown under the status line.
const HELP: &str = "i insert  d delete  l/r left/right  u undo  y redo  \
                    c copy  x cut  v paste  f find  n next  s save  q quit";

// ─── Action ─────────────────────────────────────────────────────────────────

/// What the loop does after a key has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The interactive front end: an edit session plus the message line.
struct Editor {
    session: EditSession,

    /// Message shown below the status line (cleared by silent commands).
    message: Option<String>,

    /// Whether `message` reports a failure.
    message_is_error: bool,
}

impl Editor {
    const fn new(session: EditSession) -> Self {
        Self {
            session,
            message: None,
            message_is_error: false,
        }
    }

    /// Load `path` into a fresh session.
    ///
    /// A missing file is fine (the editor starts empty and says so); any
    /// other read failure is fatal at startup.
    fn open(path: PathBuf, options: Options) -> Result<Self> {
        let mut session = EditSession::new(options);
        let outcome = session
            .load(&path)
            .with_context(|| format!("cannot open {}", path.display()))?;
        let mut editor = Self::new(session);
        editor.show(&outcome);
        Ok(editor)
    }

    // ── Messages ────────────────────────────────────────────────────────

    fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_is_error = false;
    }

    fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_is_error = true;
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.message_is_error = false;
    }

    /// Add `extra` after the current message. Empty `extra` is ignored.
    fn append_message(&mut self, extra: &str) {
        if extra.is_empty() {
            return;
        }
        let msg = match self.message.take() {
            Some(msg) => format!("{msg}  {extra}"),
            None => extra.to_string(),
        };
        self.message = Some(msg);
    }

    /// Put a command's outcome on the message line.
    fn show(&mut self, outcome: &Outcome) {
        if *outcome == Outcome::Unchanged {
            self.clear_message();
        } else {
            self.set_message(outcome.to_string());
        }
    }

    // ── Key dispatch ────────────────────────────────────────────────────

    /// Run the command bound to `key`. Unbound keys are ignored; Ctrl-C
    /// quits like `q`.
    fn handle_key(
        &mut self,
        key: Key,
        lines: &mut impl LineSource,
        out: &mut impl Write,
    ) -> io::Result<Action> {
        if key == Key::Interrupt {
            info!(target: "driver", modified = self.session.is_modified(), "interrupt");
            return Ok(Action::Quit);
        }
        let Some(ch) = key.as_char() else {
            return Ok(Action::Continue);
        };
        debug!(target: "driver", key = %ch, "dispatch");

        let outcome = match ch {
            'i' => match prompt(out, lines, "Enter text to insert: ")? {
                Some(text) => self.session.insert(&text),
                None => Outcome::Unchanged,
            },
            'd' => self.session.delete_back(),
            'l' => self.session.move_left(),
            'r' => self.session.move_right(),
            'u' => self.session.undo(),
            'y' => self.session.redo(),
            'c' => self.session.copy(),
            'x' => self.session.cut(),
            'v' => self.session.paste(),
            'f' => match prompt(out, lines, "Enter search term: ")? {
                Some(term) => self.session.search(&term),
                None => Outcome::Unchanged,
            },
            'n' => self.session.search_next(),
            's' => {
                self.save();
                return Ok(Action::Continue);
            }
            'q' => {
                info!(target: "driver", modified = self.session.is_modified(), "quit");
                return Ok(Action::Quit);
            }
            _ => return Ok(Action::Continue),
        };
        self.show(&outcome);
        Ok(Action::Continue)
    }

    /// Save to the session's path. A failure is reported, never fatal.
    fn save(&mut self) {
        match self.session.save() {
            Ok(outcome) => self.show(&outcome),
            Err(e) => {
                warn!(target: "driver", error = %e, "save_failed");
                self.set_error(format!("Failed to save the file: {e}"));
            }
        }
    }

    // ── Paint ───────────────────────────────────────────────────────────

    /// Repaint the whole screen.
    fn paint(&self, out: &mut impl Write) -> io::Result<()> {
        ansi::clear_screen(out)?;
        ansi::cursor_home(out)?;

        let text = self.session.contents();
        out.write_all(text.as_bytes())?;
        if !text.is_empty() && !text.ends_with('\n') {
            out.write_all(b"\n")?;
        }

        ansi::inverse(out)?;
        out.write_all(self.status_line().as_bytes())?;
        ansi::reset(out)?;
        out.write_all(b"\n")?;

        if let Some(msg) = &self.message {
            if self.message_is_error {
                write!(out, "E: {msg}")?;
            } else {
                out.write_all(msg.as_bytes())?;
            }
        }
        write!(out, "\n{HELP}\n")?;
        ansi::cursor_show(out)?;
        out.flush()
    }

    /// ` name [+] | pos N | L:C ` with 1-based line and column.
    fn status_line(&self) -> String {
        let name = self
            .session
            .path()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
        let dirty = if self.session.is_modified() { " [+]" } else { "" };
        let (line, col) = self.session.buffer().line_col();
        format!(
            " {name}{dirty} | pos {} | {}:{} ",
            self.session.cursor(),
            line + 1,
            col + 1
        )
    }
}

// ─── Loop ───────────────────────────────────────────────────────────────────

/// Paint, read a key, dispatch; until `q` or the key source runs dry.
fn run(
    editor: &mut Editor,
    keys: &mut impl KeySource,
    lines: &mut impl LineSource,
    out: &mut impl Write,
) -> io::Result<()> {
    loop {
        editor.paint(out)?;
        let Some(key) = keys.next_key()? else {
            debug!(target: "driver", "input_closed");
            return Ok(());
        };
        if editor.handle_key(key, lines, out)? == Action::Quit {
            return Ok(());
        }
    }
}

/// Print `label` and read one line. `None` once input is exhausted.
fn prompt(
    out: &mut impl Write,
    lines: &mut impl LineSource,
    label: &str,
) -> io::Result<Option<String>> {
    out.write_all(label.as_bytes())?;
    out.flush()?;
    lines.next_line()
}

/// Ask for a file name until a non-blank one is given.
fn prompt_path(out: &mut impl Write, lines: &mut impl LineSource) -> Result<PathBuf> {
    loop {
        match prompt(out, lines, "Enter filename to open/create: ")? {
            Some(name) if !name.trim().is_empty() => return Ok(PathBuf::from(name.trim())),
            Some(_) => {}
            None => bail!("no file name given"),
        }
    }
}

// ─── Startup ────────────────────────────────────────────────────────────────

/// Command-line arguments: an optional path plus any `name=value`
/// assignments and `name?` queries.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    path: Option<PathBuf>,
    options: Vec<String>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        for arg in args {
            if arg.contains('=') || arg.ends_with('?') {
                parsed.options.push(arg);
            } else if parsed.path.is_none() {
                parsed.path = Some(PathBuf::from(arg));
            } else {
                bail!("unexpected argument: {arg}");
            }
        }
        Ok(parsed)
    }

    /// Build the session options. Also returns the answers to any queries.
    fn options(&self) -> Result<(Options, Vec<String>)> {
        let mut options = Options::default();
        let answers = options
            .apply_all(self.options.iter().map(String::as_str))
            .context("invalid option")?;
        Ok((options, answers))
    }
}

/// Send tracing output to `jot.log` in the temp directory so it never lands
/// on the painted screen. The returned guard flushes the writer on drop.
fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = env::temp_dir();
    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|()| guard)
}

/// Log panics before the terminal hook restores the screen and prints them.
fn install_panic_logging() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn try_main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_logging();
    terminal::install_panic_hook();

    let args = Args::parse(env::args().skip(1))?;
    let (options, answers) = args.options()?;
    info!(target: "driver", %options, "startup");

    let mut keys = TerminalKeys::new();
    let mut lines = TerminalLines::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Welcome to the Command-Line Text Editor!")?;
    let path = match args.path {
        Some(path) => path,
        None => prompt_path(&mut out, &mut lines)?,
    };

    let mut editor = Editor::open(path, options)?;
    editor.append_message(&answers.join(" "));
    run(&mut editor, &mut keys, &mut lines, &mut out).context("terminal I/O failed")?;

    writeln!(out, "Exiting the editor. Goodbye!")?;
    Ok(())
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("jot: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
