//! Single diagnostics: severity, code, labeled spans and help text.

use std::fmt;

use crate::{error::ErrorCode, span::Span};

/// Whether a diagnostic rejects the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn is_error(self) -> bool {
        self == Self::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// A message pinned to a span of the source document.
///
/// The primary label marks the problem itself; secondary labels point at
/// related places, such as an earlier declaration of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }
}

/// One problem found in a document.
///
/// Rendered by the CLI roughly as:
///
/// ```text
/// error[E200]: message `GetQuoteRequest` is not declared
///    |
/// 24 |       <input message="tns:GetQuoteRequest"/>
///    |       ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ undefined message
///    |
///    = help: declare the message or fix the reference
/// ```
///
/// # Example
///
/// ```
/// # use sigdoc_schema::error::{Diagnostic, ErrorCode};
/// # use sigdoc_schema::Span;
/// let diag = Diagnostic::error("message `Foo` is not declared")
///     .with_code(ErrorCode::E200)
///     .with_label(Span::new(0..10), "referenced here")
///     .with_help("declare the message or fix the reference");
/// assert_eq!(diag.to_string(), "error[E200]: message `Foo` is not declared");
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message.into())
    }

    fn with_severity(severity: Severity, message: String) -> Self {
        Self {
            severity,
            code: None,
            message,
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn with_code(self, code: ErrorCode) -> Self {
        Self {
            code: Some(code),
            ..self
        }
    }

    /// Adds the label marking the problem itself.
    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labeled(span, message.into(), true)
    }

    /// Adds a label pointing at related context.
    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labeled(span, message.into(), false)
    }

    pub fn with_help(self, help: impl Into<String>) -> Self {
        Self {
            help: Some(help.into()),
            ..self
        }
    }

    fn labeled(mut self, span: Span, message: String, primary: bool) -> Self {
        self.labels.push(Label {
            span,
            message,
            primary,
        });
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Labels in the order they were added.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{code}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_diagnostic() {
        let diag = Diagnostic::error("unclosed element");

        assert!(diag.severity().is_error());
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_labels_keep_order_and_role() {
        let diag = Diagnostic::error("port type `Stock` is declared twice")
            .with_code(ErrorCode::E103)
            .with_label(Span::new(100..120), "duplicate declaration")
            .with_secondary_label(Span::new(50..70), "first declared here")
            .with_help("rename or remove one of the port types");

        assert_eq!(diag.code(), Some(ErrorCode::E103));
        let labels = diag.labels();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].is_primary());
        assert_eq!(labels[0].span(), Span::new(100..120));
        assert!(!labels[1].is_primary());
        assert_eq!(labels[1].message(), "first declared here");
        assert_eq!(diag.help(), Some("rename or remove one of the port types"));
    }

    #[test]
    fn test_display_without_code() {
        let diag = Diagnostic::warning("part has no declaration");

        assert!(!diag.severity().is_error());
        assert_eq!(diag.to_string(), "warning: part has no declaration");
    }
}
