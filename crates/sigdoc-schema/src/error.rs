//! Diagnostics for rejected documents.
//!
//! Every problem found while reading XML or extracting a service description
//! is a [`Diagnostic`]: a severity, an optional [`ErrorCode`], labeled spans
//! into the source text and an optional help line. A rejected document
//! yields a [`ParseError`] holding all of them.
//!
//! ```
//! # use sigdoc_schema::error::{Diagnostic, ErrorCode, ParseError};
//! # use sigdoc_schema::Span;
//! let diag = Diagnostic::error("message `GetQuoteRequest` is declared twice")
//!     .with_code(ErrorCode::E103)
//!     .with_label(Span::new(100..120), "duplicate declaration")
//!     .with_secondary_label(Span::new(50..70), "first declared here");
//! let err = ParseError::from(diag);
//! assert_eq!(err.diagnostics().len(), 1);
//! ```

mod code;
mod diagnostic;
mod report;

pub(crate) use report::DiagnosticCollector;

pub use code::ErrorCode;
pub use diagnostic::{Diagnostic, Label, Severity};
pub use report::ParseError;
