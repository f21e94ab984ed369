//! Diagnostic module - Error and warning reporting infrastructure.
//!
//! Every phase of the front-end reports through a shared [`Handler`], which
//! collects [`Diagnostic`]s and tracks error and warning counts. Rendering
//! (colourised severity prefix plus a framed source excerpt) lives in
//! [`emit`] and is driven by a [`DiagnosticConfig`] value; there is no
//! process-wide configuration.
//!
//! # Examples
//!
//! ```
//! use coltc_util::{Handler, SourceSpan};
//!
//! let handler = Handler::new();
//! handler.error("unexpected token", SourceSpan::NONE);
//!
//! assert!(handler.has_errors());
//! assert_eq!(handler.error_count(), 1);
//! ```

mod emit;

pub use emit::{print_diagnostic, render_diagnostic, DiagnosticConfig};

use crate::span::SourceSpan;
use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level.
///
/// Errors and warnings bump the [`Handler`] counters; messages bump
/// neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Informational message.
    Message,
    /// A warning that does not prevent compilation.
    Warning,
    /// An error that prevents compilation.
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Message => write!(f, "message"),
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic with severity and source location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity level.
    pub level: Level,
    /// Main diagnostic text.
    pub message: String,
    /// Source location; [`SourceSpan::NONE`] for location-less reports.
    pub span: SourceSpan,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(level: Level, message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            level,
            message: message.into(),
            span,
        }
    }

    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// Create an informational message.
    pub fn message(message: impl Into<String>, span: SourceSpan) -> Self {
        Self::new(Level::Message, message, span)
    }
}

/// Collector for diagnostics.
///
/// Uses interior mutability so the lexer and parser can share one handler
/// without threading `&mut` through every call.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Report an error.
    pub fn error(&self, message: impl Into<String>, span: SourceSpan) {
        self.emit(Diagnostic::error(message, span));
    }

    /// Report a warning.
    pub fn warning(&self, message: impl Into<String>, span: SourceSpan) {
        self.emit(Diagnostic::warning(message, span));
    }

    /// Report an informational message.
    pub fn message(&self, message: impl Into<String>, span: SourceSpan) {
        self.emit(Diagnostic::message(message, span));
    }

    /// Emit a pre-built diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check if any errors have been reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of errors reported so far.
    pub fn error_count(&self) -> u32 {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count() as u32
    }

    /// Number of warnings reported so far.
    pub fn warning_count(&self) -> u32 {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count() as u32
    }

    /// Get a snapshot of all diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Clear all diagnostics.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}
