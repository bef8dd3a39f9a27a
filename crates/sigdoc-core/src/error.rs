//! Error types for tree operations.

use thiserror::Error;

/// Recoverable errors raised while building or checking a signature tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("a {child} cannot be owned by a {parent}")]
    InvalidChild {
        parent: &'static str,
        child: &'static str,
    },

    #[error("expected a {expected}, found a {found}")]
    NotA {
        expected: &'static str,
        found: &'static str,
    },

    #[error("cached path `{cached}` of `{node}` differs from recomputed path `{recomputed}`")]
    StalePath {
        node: String,
        cached: String,
        recomputed: String,
    },
}
