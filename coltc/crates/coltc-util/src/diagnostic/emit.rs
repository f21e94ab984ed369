//! Rendering of diagnostics to text.
//!
//! A diagnostic prints as a severity-prefixed line followed by a framed
//! excerpt of the offending source:
//!
//! ```text
//! error: Expected a ';'!
//!  3 | var x = 5
//!    |         ^
//! ```
//!
//! Single-line spans get a caret underline whose width equals the span's
//! byte length; multi-line spans print every crossed line with a
//! right-aligned line-number gutter and the highlighted portion emitted in
//! the severity colour.

use super::{Diagnostic, Level};
use std::fmt::Write;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Rendering and suppression switches.
///
/// Threaded through as a value by the embedding driver; never global.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticConfig {
    /// Emit ANSI colour codes.
    pub colored: bool,
    /// Suppress messages.
    pub no_message: bool,
    /// Suppress warnings.
    pub no_warning: bool,
    /// Suppress errors.
    pub no_error: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            colored: true,
            no_message: false,
            no_warning: false,
            no_error: false,
        }
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Message => CYAN,
        Level::Warning => YELLOW,
        Level::Error => RED,
    }
}

/// Render a diagnostic against its source buffer.
///
/// Returns `None` when the diagnostic's severity is suppressed by the
/// configuration.
pub fn render_diagnostic(
    diag: &Diagnostic,
    source: &str,
    config: &DiagnosticConfig,
) -> Option<String> {
    match diag.level {
        Level::Message if config.no_message => return None,
        Level::Warning if config.no_warning => return None,
        Level::Error if config.no_error => return None,
        _ => {}
    }

    let (color, reset) = if config.colored {
        (level_color(diag.level), RESET)
    } else {
        ("", "")
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}{}{}: {}", color, diag.level, reset, diag.message);

    if diag.span.is_none() {
        return Some(out);
    }
    if diag.span.is_multiline() {
        render_multi_line(&mut out, diag, source, color, reset);
    } else {
        render_single_line(&mut out, diag, source, color, reset);
    }
    Some(out)
}

/// Render a diagnostic to stderr, honouring the configuration.
pub fn print_diagnostic(diag: &Diagnostic, source: &str, config: &DiagnosticConfig) {
    if let Some(text) = render_diagnostic(diag, source, config) {
        eprint!("{}", text);
    }
}

fn render_single_line(out: &mut String, diag: &Diagnostic, source: &str, color: &str, reset: &str) {
    let span = diag.span;
    let before = &source[span.lines.start..span.expression.start];
    let expr = span.expression_of(source);
    let after = &source[span.expression.end..span.lines.end];

    let line_nb = span.line_begin.to_string();
    let _ = writeln!(out, " {} | {}{}{}{}{}", line_nb, before, color, expr, reset, after);

    // Underline width equals the span byte length, at least one caret.
    // An empty span at end of line points just past the end.
    let width = expr.len().max(1);
    let _ = writeln!(
        out,
        " {:nb$} | {:pre$}{:~<tilde$}^",
        "",
        "",
        "",
        nb = line_nb.len(),
        pre = before.len(),
        tilde = width - 1,
    );
}

fn render_multi_line(out: &mut String, diag: &Diagnostic, source: &str, color: &str, reset: &str) {
    let span = diag.span;
    let num_width = span.line_end.to_string().len();

    let mut line_nb = span.line_begin;
    let mut pos = span.lines.start;
    while pos < span.lines.end {
        let line_end = source[pos..span.lines.end]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(span.lines.end);

        // Portion of this line covered by the expression
        let hi_start = span.expression.start.clamp(pos, line_end);
        let hi_end = span.expression.end.clamp(hi_start, line_end);

        let _ = writeln!(
            out,
            " {:>num_width$} | {}{}{}{}{}",
            line_nb,
            &source[pos..hi_start],
            color,
            &source[hi_start..hi_end],
            reset,
            &source[hi_end..line_end],
        );

        pos = line_end + 1;
        line_nb += 1;
    }
}
