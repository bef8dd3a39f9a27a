//! Stable codes for document diagnostics.
//!
//! `E0xx` codes come from reading the XML text, `E1xx` from the shape of a
//! service description, `E2xx` from resolving references inside it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The XML reader rejected the text.
    E001,
    /// A closing tag does not match the innermost open element.
    E002,
    /// The document ended inside an element.
    E003,
    /// An attribute has no value or its value cannot be unescaped.
    E004,
    /// No root element.
    E005,
    /// An element follows the closed root element.
    E006,
    /// The root element is not `definitions`.
    E100,
    /// A message, part, port type or operation has no `name`.
    E101,
    /// An operation input, output or fault has no `message` attribute.
    E102,
    /// A message or port type name is declared twice.
    E103,
    /// An operation references a message the document does not declare.
    E200,
}

impl ErrorCode {
    /// The code and a short description, as `(code, description)`.
    const fn info(self) -> (&'static str, &'static str) {
        match self {
            Self::E001 => ("E001", "malformed xml"),
            Self::E002 => ("E002", "mismatched closing tag"),
            Self::E003 => ("E003", "unclosed element"),
            Self::E004 => ("E004", "malformed attribute"),
            Self::E005 => ("E005", "empty document"),
            Self::E006 => ("E006", "multiple root elements"),
            Self::E100 => ("E100", "unexpected root element"),
            Self::E101 => ("E101", "missing name attribute"),
            Self::E102 => ("E102", "missing message reference"),
            Self::E103 => ("E103", "duplicate declaration"),
            Self::E200 => ("E200", "undefined message"),
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.info().0
    }

    /// Default label text for the code's primary span.
    pub const fn description(self) -> &'static str {
        self.info().1
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
