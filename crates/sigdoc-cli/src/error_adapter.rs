//! Rendering [`SigdocError`] through miette.
//!
//! A rejected artifact is expanded into one [`Reportable`] per diagnostic,
//! each carrying the artifact source so miette can draw snippets. Every
//! other error becomes a single report without source.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use sigdoc::SigdocError;
use sigdoc_schema::{
    Span,
    error::{Diagnostic, Severity},
};

/// One report, ready to be rendered by a miette handler.
#[derive(Debug)]
pub struct Reportable<'a> {
    message: String,
    code: Option<String>,
    severity: miette::Severity,
    help: Option<&'a str>,
    labels: Vec<LabeledSpan>,
    source: Option<&'a str>,
}

impl<'a> Reportable<'a> {
    /// A diagnostic of artifact `name`, shown against `src`.
    pub fn from_diagnostic(diag: &'a Diagnostic, name: &str, src: &'a str) -> Self {
        let labels = diag
            .labels()
            .iter()
            .map(|label| {
                let message = Some(label.message().to_string());
                let span = span_to_miette(label.span());
                if label.is_primary() {
                    LabeledSpan::new_primary_with_span(message, span)
                } else {
                    LabeledSpan::new_with_span(message, span)
                }
            })
            .collect();

        Self {
            message: format!("{name}: {}", diag.message()),
            code: diag.code().map(|code| code.to_string()),
            severity: match diag.severity() {
                Severity::Error => miette::Severity::Error,
                Severity::Warning => miette::Severity::Warning,
            },
            help: diag.help(),
            labels,
            source: Some(src),
        }
    }

    /// An error without source location.
    pub fn from_error(err: &SigdocError) -> Self {
        let code = match err {
            SigdocError::Io(_) => Some("sigdoc::io"),
            SigdocError::Config(_) => Some("sigdoc::config"),
            SigdocError::Tree(_) => Some("sigdoc::tree"),
            SigdocError::UnsupportedArtifact { .. } => None,
        };

        Self {
            message: err.to_string(),
            code: code.map(str::to_string),
            severity: miette::Severity::Error,
            help: None,
            labels: Vec::new(),
            source: None,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Reportable<'_> {}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help.map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source
            .as_ref()
            .map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            return None;
        }
        Some(Box::new(self.labels.iter().cloned()))
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`SigdocError`] into the reports to render, in order.
pub fn to_reportables(err: &SigdocError) -> Vec<Reportable<'_>> {
    match err {
        SigdocError::UnsupportedArtifact { name, err, src } => err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::from_diagnostic(diag, name, src))
            .collect(),
        _ => vec![Reportable::from_error(err)],
    }
}
