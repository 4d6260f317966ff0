//! Centralized shell output.
//!
//! Status lines use the cargo layout: a right-aligned, optionally colored
//! status word followed by the message. Operations write status lines to
//! whatever sink they are handed; the CLI owns a [`Shell`] that decides
//! between human output, quiet output and JSON lines.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

use serde::Deserialize;

/// Output verbosity level (human mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: debug logging enabled as well
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success (green)
    Finished,
    Created,

    // In progress (cyan)
    Building,
    Packaging,
    Imaging,

    // Info (blue)
    Info,

    // Warning (yellow)
    Warning,

    // Error (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Created => "Created",
            Status::Building => "Building",
            Status::Packaging => "Packaging",
            Status::Imaging => "Imaging",
            Status::Info => "Info",
            Status::Warning => "Warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Created => "\x1b[1;32m",
            Status::Building | Status::Packaging | Status::Imaging => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }

    fn width(&self) -> usize {
        12
    }
}

/// Format a status prefix with optional color.
pub fn format_status(status: Status, color: bool) -> String {
    let text = status.as_str();
    let width = status.width();

    if color {
        format!("{}{:>width$}\x1b[0m", status.color_code(), text, width = width)
    } else {
        format!("{:>width$}", text, width = width)
    }
}

/// Write one uncolored status line to an arbitrary sink.
///
/// Write errors on the sink are not fatal to the operation producing them.
pub fn write_status(out: &mut dyn Write, status: Status, msg: impl Display) {
    let _ = writeln!(out, "{} {}", format_status(status, false), msg);
}

/// A status line sink shared by the workers of one operation.
pub struct StatusSink<'a> {
    out: Mutex<&'a mut (dyn Write + Send)>,
}

impl<'a> StatusSink<'a> {
    pub fn new(out: &'a mut (dyn Write + Send)) -> Self {
        StatusSink {
            out: Mutex::new(out),
        }
    }

    pub fn status(&self, status: Status, msg: impl Display) {
        if let Ok(mut out) = self.out.lock() {
            write_status(&mut **out, status, msg);
        }
    }
}

/// Central shell for CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    json: bool,
}

impl Shell {
    /// Create a shell from CLI flags.
    ///
    /// JSON mode takes precedence over quiet/verbose for status output.
    pub fn from_flags(verbosity: Verbosity, color: ColorChoice, json: bool) -> Self {
        let use_color = !json
            && match color {
                ColorChoice::Auto => io::stderr().is_terminal(),
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            };

        Shell {
            verbosity,
            use_color,
            json,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Whether operations should receive a live status sink.
    pub fn wants_status(&self) -> bool {
        !self.json && !self.is_quiet()
    }

    /// Print a status message to stderr.
    ///
    /// In quiet mode only errors are printed; JSON mode prints nothing here.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.json {
            return;
        }
        if self.is_quiet() && status != Status::Error {
            return;
        }
        eprintln!("{} {}", format_status(status, self.use_color), msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print a JSON event to stdout. Ignored in human mode.
    pub fn json_event<T: serde::Serialize>(&self, event: &T) {
        if !self.json {
            return;
        }
        if let Ok(line) = serde_json::to_string(event) {
            println!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::from_flags(Verbosity::Normal, ColorChoice::Auto, false)
    }
}
