//! User-friendly diagnostic messages.
//!
//! Every error surfaced to the operator names the product and dister
//! involved and, where possible, suggests how to fix it.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no project file is found.
    pub const NO_PROJECT: &str = "Create a `Quay.toml` at the project root";

    /// Suggestion when a product is not found.
    pub const PRODUCT_NOT_FOUND: &str = "Run `quay products` to list configured products";

    /// Suggestion when a build or dist step fails.
    pub const STEP_FAILED: &str = "Run with `--verbose` for subprocess details";

    /// Suggestion when a dister or docker builder type is unknown.
    pub const UNKNOWN_TYPE: &str =
        "Built-in dister types are `os-arch-bin`, `bin` and `manual`; docker builder type is `default`";
}

const BOLD_RED: &str = "\x1b[1;31m";
const BOLD_YELLOW: &str = "\x1b[1;33m";
const BOLD_GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Severity::Error => BOLD_RED,
            Severity::Warning => BOLD_YELLOW,
        }
    }
}

/// A message plus the context an operator needs to act on it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    /// Extra lines; multi-line entries (script output) are indented as a block
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
    /// File the problem was found in
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Error,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(message)
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for the terminal, with ANSI colors when `color` is set.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{}{}{}", code, text, RESET)
            } else {
                text.to_string()
            }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {}",
            paint(self.severity.color(), self.severity.label()),
            self.message
        );

        if let Some(path) = &self.location {
            let _ = writeln!(out, "  --> {}", path.display());
        }

        for ctx in &self.context {
            let mut lines = ctx.lines();
            if let Some(first) = lines.next() {
                let _ = writeln!(out, "  = {}", first);
            }
            for line in lines {
                let _ = writeln!(out, "    {}", line);
            }
        }

        if !self.suggestions.is_empty() {
            let _ = writeln!(out, "\n{}: consider:", paint(BOLD_GREEN, "help"));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, suggestion);
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
