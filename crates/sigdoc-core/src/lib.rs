//! Sigdoc Core Types and Algorithms
//!
//! This crate provides the foundational model for documenting service
//! interfaces with thematic roles. It includes:
//!
//! - **Identity**: Opaque selection handles for tree nodes ([`identifier::ElementHandle`])
//! - **Delimiters**: Per-dialect path delimiters ([`delimiters::Delimiters`])
//! - **Documentation**: Addressee texts and thematic roles ([`documentation`] module)
//! - **Tree**: The arena-backed signature element tree ([`tree`] module)
//! - **Path**: Path stamping and parsing for parameters ([`path`] module)
//! - **Matcher**: Re-attaching persisted documentation by path ([`matcher`] module)
//! - **Roles**: Collecting already assigned thematic roles ([`roles`] module)

pub mod delimiters;
pub mod documentation;
pub mod identifier;
pub mod matcher;
pub mod path;
pub mod roles;
pub mod tree;

mod error;
#[cfg(test)]
mod testing;

pub use error::TreeError;
