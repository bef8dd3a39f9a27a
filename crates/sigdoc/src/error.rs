//! Error types for sigdoc operations.
//!
//! This module provides the main error type [`SigdocError`] which wraps
//! the error conditions of loading, matching and writing back artifacts.

use std::io;

use thiserror::Error;

use sigdoc_core::TreeError;
use sigdoc_schema::error::ParseError;

use crate::config::ConfigError;

/// The main error type for sigdoc operations.
///
/// # Diagnostic Variants
///
/// `UnsupportedArtifact` carries the structured diagnostics of the rejected
/// document together with its source text, for reporting with snippets. No
/// part of a rejected artifact is ever returned.
#[derive(Debug, Error)]
pub enum SigdocError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("unsupported artifact `{name}`: {err}")]
    UnsupportedArtifact {
        name: String,
        err: ParseError,
        src: String,
    },

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

impl SigdocError {
    /// Create a new `UnsupportedArtifact` error with the associated source.
    pub fn new_unsupported_artifact(
        name: impl Into<String>,
        err: ParseError,
        src: impl Into<String>,
    ) -> Self {
        Self::UnsupportedArtifact {
            name: name.into(),
            err,
            src: src.into(),
        }
    }
}
