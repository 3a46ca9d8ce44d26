//! Diagnostics for the screenplay reader.
//!
//! A [`Diagnostic`] is a single error or warning with an optional
//! [`ErrorCode`], labelled source spans, and help text. Readers accumulate
//! them in a [`DiagnosticCollector`]; errors end up in a [`ParseError`],
//! warnings are logged and reading continues.
//!
//! # Example
//!
//! ```
//! # use unfurl_parser::{Span, error::{Diagnostic, ErrorCode}};
//! let diag = Diagnostic::error("unterminated boneyard comment")
//!     .with_code(ErrorCode::E001)
//!     .with_label(Span::new(10..12), "opened here")
//!     .with_help("close it with `*/`");
//!
//! assert_eq!(diag.to_string(), "error[E001]: unterminated boneyard comment");
//! ```

use std::fmt;

use log::warn;
use thiserror::Error;

use crate::span::Span;

/// Error codes for reader diagnostics.
///
/// - `E0xx` - Source structure errors
/// - `E1xx` - Element warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A `/*` boneyard comment is never closed.
    E001,

    /// A `[[` note is never closed.
    E002,

    /// A section heading has no title.
    E101,
}

impl ErrorCode {
    /// The code as written in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E101 => "E101",
        }
    }

    /// A short description of the condition.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated boneyard comment",
            ErrorCode::E002 => "unterminated note",
            ErrorCode::E101 => "untitled section heading",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Reading cannot produce a trustworthy element stream.
    Error,
    /// Reading continues; the element stream is still produced.
    Warning,
}

impl Severity {
    /// Returns `true` if this is an error severity.
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A message attached to a span of source text.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// The labelled span.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if this label marks the main location.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

/// A single error or warning with source locations.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
            is_primary: true,
        });
        self
    }

    /// Add a secondary label.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
            is_primary: false,
        });
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// The severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// The primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// All labels, primary first in insertion order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// One or more error diagnostics from reading a screenplay.
#[derive(Debug, Error)]
#[error("{}", summarize(.diagnostics))]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// All diagnostics carried by this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    match diagnostics {
        [] => String::new(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

/// Accumulates diagnostics so that one pass can report every problem.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Fails with every error collected; warnings are logged and dropped.
    pub(crate) fn finish(self) -> Result<(), ParseError> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .diagnostics
            .into_iter()
            .partition(|diag| diag.severity().is_error());

        for warning in &warnings {
            warn!(code:? = warning.code(); "{}", warning.message());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ParseError::from(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E101.description(), "untitled section heading");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error("unterminated note").with_code(ErrorCode::E002);
        assert_eq!(diag.to_string(), "error[E002]: unterminated note");

        let diag = Diagnostic::warning("something odd");
        assert_eq!(diag.to_string(), "warning: something odd");
    }

    #[test]
    fn test_diagnostic_labels() {
        let diag = Diagnostic::error("unterminated boneyard comment")
            .with_label(Span::new(0..2), "opened here")
            .with_secondary_label(Span::new(8..10), "nearest close")
            .with_help("close it with `*/`");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(!diag.labels()[1].is_primary());
        assert_eq!(diag.help(), Some("close it with `*/`"));
    }

    #[test]
    fn test_parse_error_display_multiple() {
        let err = ParseError::from(vec![
            Diagnostic::error("first"),
            Diagnostic::error("second"),
        ]);
        assert_eq!(err.to_string(), "error: first (+1 more)");
    }

    #[test]
    fn test_collector_ignores_warnings() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("just a warning"));
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_only_errors() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("warning"));
        collector.emit(Diagnostic::error("error 1"));
        collector.emit(Diagnostic::error("error 2"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].message(), "error 1");
    }
}
