//! Editor options — the `:set` system.
//!
//! Global boolean options that shape searching and the command-line overlay,
//! the parser for `:set` directives, and rc-file loading. The overlay reads
//! `incsearch` once when it opens; each preview update reads `ignorecase`,
//! `smartcase`, `wrapscan` and `magic`. The preview always finds the end of
//! the pattern with `magic` on; the option governs how the pattern itself
//! is compiled.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `:set option`    | Enable boolean                |
//! | `:set nooption`  | Disable boolean               |
//! | `:set option!`   | Toggle boolean                |
//! | `:set invoption` | Toggle boolean                |
//! | `:set option?`   | Query current value           |
//! | `:set`           | Show changed options          |
//! | `:set all`       | Show all options              |
//!
//! # Option names
//!
//! | Full name    | Abbrev | Default |
//! |--------------|--------|---------|
//! | `ignorecase` | `ic`   | false   |
//! | `smartcase`  | `scs`  | false   |
//! | `incsearch`  | `is`   | true    |
//! | `wrapscan`   | `ws`   | true    |
//! | `magic`      |        | true    |
//!
//! # rc files
//!
//! An rc file holds one `set` (or `se`) command per line. Blank lines and
//! lines starting with `"` are ignored:
//!
//! ```text
//! " search behaviour
//! set ignorecase smartcase
//! set noincsearch
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from applying `:set` directives or loading rc files.
#[derive(Debug, Error)]
pub enum OptionError {
    #[error("E518: Unknown option: {0}")]
    Unknown(String),

    #[error("E474: Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{path}:{line}: {source}")]
    Rc {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<Self>,
    },

    #[error("line {line}: not a set command: {text}")]
    NotASetCommand { line: usize, text: String },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for option handling.
pub type Result<T> = std::result::Result<T, OptionError>;

// ---------------------------------------------------------------------------
// Option identity
// ---------------------------------------------------------------------------

/// A known option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionId {
    IgnoreCase,
    SmartCase,
    IncSearch,
    WrapScan,
    Magic,
}

impl OptionId {
    /// Every option, in `:set all` display order.
    pub const ALL: [Self; 5] = [
        Self::IgnoreCase,
        Self::IncSearch,
        Self::Magic,
        Self::SmartCase,
        Self::WrapScan,
    ];

    /// Look up an option by full name or abbreviation.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let id = match name {
            "ignorecase" | "ic" => Self::IgnoreCase,
            "smartcase" | "scs" => Self::SmartCase,
            "incsearch" | "is" => Self::IncSearch,
            "wrapscan" | "ws" => Self::WrapScan,
            "magic" => Self::Magic,
            _ => return None,
        };
        Some(id)
    }

    /// The full option name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IgnoreCase => "ignorecase",
            Self::SmartCase => "smartcase",
            Self::IncSearch => "incsearch",
            Self::WrapScan => "wrapscan",
            Self::Magic => "magic",
        }
    }
}

/// Returns `true` if `name` is a known option (full name or abbreviation).
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    OptionId::from_name(name).is_some()
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// The global option values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    pub ignorecase: bool,
    pub smartcase: bool,
    pub incsearch: bool,
    pub wrapscan: bool,
    pub magic: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ignorecase: false,
            smartcase: false,
            incsearch: true,
            wrapscan: true,
            magic: true,
        }
    }
}

impl Options {
    /// Current value of an option.
    #[must_use]
    pub const fn get(&self, id: OptionId) -> bool {
        match id {
            OptionId::IgnoreCase => self.ignorecase,
            OptionId::SmartCase => self.smartcase,
            OptionId::IncSearch => self.incsearch,
            OptionId::WrapScan => self.wrapscan,
            OptionId::Magic => self.magic,
        }
    }

    /// Set an option's value.
    pub const fn set(&mut self, id: OptionId, value: bool) {
        let slot = match id {
            OptionId::IgnoreCase => &mut self.ignorecase,
            OptionId::SmartCase => &mut self.smartcase,
            OptionId::IncSearch => &mut self.incsearch,
            OptionId::WrapScan => &mut self.wrapscan,
            OptionId::Magic => &mut self.magic,
        };
        *slot = value;
    }

    /// Look up an option by name. `None` for unknown names.
    #[must_use]
    pub fn is_set(&self, name: &str) -> Option<bool> {
        OptionId::from_name(name).map(|id| self.get(id))
    }

    /// The case-folding inputs for pattern matching.
    #[must_use]
    pub const fn case_policy(&self) -> crate::pattern::CasePolicy {
        crate::pattern::CasePolicy {
            ignorecase: self.ignorecase,
            smartcase: self.smartcase,
        }
    }

    /// Apply one `:set` directive.
    ///
    /// Returns the text to show for queries (`noincsearch`, or a list for
    /// `:set all`), `None` for assignments.
    ///
    /// # Errors
    ///
    /// Unknown option names and `option=value` forms (every option here is
    /// boolean) are rejected.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>> {
        match directive {
            SetDirective::On(name) => {
                self.set(lookup(name)?, true);
                Ok(None)
            }
            SetDirective::Off(name) => {
                self.set(lookup(name)?, false);
                Ok(None)
            }
            SetDirective::Toggle(name) => {
                let id = lookup(name)?;
                self.set(id, !self.get(id));
                Ok(None)
            }
            SetDirective::Query(name) => {
                let id = lookup(name)?;
                Ok(Some(format_bool(id.name(), self.get(id))))
            }
            SetDirective::Assign(name, value) => {
                lookup(name)?;
                Err(OptionError::InvalidArgument(format!("{name}={value}")))
            }
            SetDirective::ShowChanged => Ok(Some(self.describe(true))),
            SetDirective::ShowAll => Ok(Some(self.describe(false))),
        }
    }

    /// Apply the arguments of one `:set` command.
    ///
    /// Stops at the first failing directive; earlier ones stay applied,
    /// matching Vim. Query outputs are joined with spaces.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn apply_set(&mut self, args: &str) -> Result<Option<String>> {
        let mut shown = Vec::new();
        for directive in parse_set(args) {
            if let Some(text) = self.apply(&directive)? {
                shown.push(text);
            }
        }
        Ok((!shown.is_empty()).then(|| shown.join(" ")))
    }

    /// Build options from rc-file text, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::NotASetCommand`] for lines that are not `set`
    /// commands, or the directive error wrapped with its line number.
    pub fn from_rc(source: &str) -> Result<Self> {
        let mut options = Self::default();
        for (idx, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('"') {
                continue;
            }
            let args = strip_set_command(line).ok_or_else(|| OptionError::NotASetCommand {
                line: idx + 1,
                text: line.to_string(),
            })?;
            options.apply_set(args).map_err(|e| OptionError::Rc {
                path: PathBuf::new(),
                line: idx + 1,
                source: Box::new(e),
            })?;
        }
        Ok(options)
    }

    /// Load options from an rc file on disk.
    ///
    /// # Errors
    ///
    /// I/O failures and any error from [`from_rc`](Self::from_rc), with the
    /// path attached.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| OptionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_rc(&source).map_err(|e| match e {
            OptionError::Rc { line, source, .. } => OptionError::Rc {
                path: path.to_path_buf(),
                line,
                source,
            },
            other => other,
        })?;
        debug!(path = %path.display(), ?options, "loaded rc file");
        Ok(options)
    }

    /// Render options for `:set` (changed only) or `:set all`.
    fn describe(&self, changed_only: bool) -> String {
        let defaults = Self::default();
        OptionId::ALL
            .iter()
            .filter(|&&id| !changed_only || self.get(id) != defaults.get(id))
            .map(|&id| format_bool(id.name(), self.get(id)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn lookup(name: &str) -> Result<OptionId> {
    OptionId::from_name(name).ok_or_else(|| OptionError::Unknown(name.to_string()))
}

/// Strip a leading `set`/`se` (and an optional `:`) from an rc line.
fn strip_set_command(line: &str) -> Option<&str> {
    let line = line.strip_prefix(':').unwrap_or(line);
    let (cmd, rest) = line
        .find(char::is_whitespace)
        .map_or((line, ""), |pos| (&line[..pos], &line[pos..]));
    matches!(cmd, "set" | "se").then_some(rest)
}

// ---------------------------------------------------------------------------
// :set parsing
// ---------------------------------------------------------------------------

/// A parsed `:set` directive.
///
/// Produced by [`parse_set`] from the arguments to `:set`. [`Options::apply`]
/// interprets these to read or modify option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option` — enable a boolean option.
    On(String),

    /// `:set nooption` — disable a boolean option.
    Off(String),

    /// `:set option!` / `:set invoption` — toggle a boolean option.
    Toggle(String),

    /// `:set option?` — query the current value.
    Query(String),

    /// `:set option=value` — assign a value.
    Assign(String, String),

    /// `:set` with no arguments — show changed options.
    ShowChanged,

    /// `:set all` — show all options.
    ShowAll,
}

/// Parse the full `:set` arguments string into directives.
///
/// Multiple space-separated arguments are supported (e.g., `:set ic scs`).
/// An empty argument string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    // Assignment: option=value
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    // Query: option?
    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    // Toggle: option!
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // Prefixes only count when the remainder is a known option, so a future
    // option whose name starts with "no" or "inv" still parses as itself.
    if let Some(name) = arg.strip_prefix("no") {
        if is_known_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }
    if let Some(name) = arg.strip_prefix("inv") {
        if is_known_option(name) {
            return SetDirective::Toggle(name.to_string());
        }
    }

    SetDirective::On(arg.to_string())
}

/// Format a boolean option for display (`:set` output).
///
/// Returns `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
