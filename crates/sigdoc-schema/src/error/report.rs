//! Rejection of a whole document.
//!
//! [`ParseError`] carries every diagnostic that led to a rejection.
//! Extraction passes use a [`DiagnosticCollector`] so that one run reports
//! all structural problems of a document, not just the first.

use std::fmt;

use log::warn;

use crate::error::Diagnostic;

/// A rejected document and the reasons for it, in discovery order.
#[derive(Debug, Clone)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// The first diagnostic, followed by how many others were found.
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.diagnostics.split_first() else {
            return f.write_str("document rejected");
        };
        if rest.is_empty() {
            write!(f, "{first}")
        } else {
            write!(f, "{first} (+{} more)", rest.len())
        }
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}

/// Gathers diagnostics until a pass is over.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Fails with every collected diagnostic if any of them is an error.
    ///
    /// Warnings alone do not reject the document; they are logged.
    pub fn finish(self) -> Result<(), ParseError> {
        if self
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity().is_error())
        {
            return Err(ParseError::new(self.diagnostics));
        }
        for diagnostic in &self.diagnostics {
            warn!(diagnostic:%; "Document accepted with warning");
        }
        Ok(())
    }
}
