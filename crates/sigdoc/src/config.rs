//! Configuration types for sigdoc.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining delimiter and flattening settings.
//! - [`DelimitersConfig`] - The [`Delimiters`] of each artifact dialect.
//! - [`FlattenConfig`] - How flattened message paths are written.
//!
//! # Example
//!
//! ```
//! # use sigdoc::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.delimiters().interface_description().path(), ";");
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use sigdoc_core::delimiters::Delimiters;
use sigdoc_schema::flatten::Notation;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Delimiter configuration section.
    #[serde(default)]
    delimiters: DelimitersConfig,

    /// Flattening configuration section.
    #[serde(default)]
    flatten: FlattenConfig,
}

impl AppConfig {
    pub fn new(delimiters: DelimitersConfig, flatten: FlattenConfig) -> Self {
        Self {
            delimiters,
            flatten,
        }
    }

    pub fn delimiters(&self) -> &DelimitersConfig {
        &self.delimiters
    }

    pub fn flatten(&self) -> &FlattenConfig {
        &self.flatten
    }

    /// Replaces the configured notation.
    pub fn with_notation(mut self, notation: NotationKind) -> Self {
        self.flatten.notation = notation;
        self
    }

    /// The [`Notation`] metadata paths are written in.
    ///
    /// The delimited notation uses the interface-description delimiters.
    pub fn notation(&self) -> Notation {
        match self.flatten.notation {
            NotationKind::Dotted => Notation::Dotted,
            NotationKind::Delimited => {
                Notation::Delimited(self.delimiters.interface_description.clone())
            }
        }
    }

    /// Checks every delimiter set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the dialect whose
    /// delimiters are empty or not pairwise distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dialects = [
            ("interface_description", &self.delimiters.interface_description),
            ("procedural_source", &self.delimiters.procedural_source),
        ];
        for (dialect, delimiters) in dialects {
            delimiters
                .validate()
                .map_err(|reason| ConfigError::Validation(format!("{dialect}: {reason}")))?;
        }
        Ok(())
    }
}

/// Delimiters of each artifact dialect.
#[derive(Debug, Clone, Deserialize)]
pub struct DelimitersConfig {
    #[serde(default = "Delimiters::interface_description")]
    interface_description: Delimiters,

    #[serde(default = "Delimiters::procedural_source")]
    procedural_source: Delimiters,
}

impl DelimitersConfig {
    pub fn new(interface_description: Delimiters, procedural_source: Delimiters) -> Self {
        Self {
            interface_description,
            procedural_source,
        }
    }

    pub fn interface_description(&self) -> &Delimiters {
        &self.interface_description
    }

    pub fn procedural_source(&self) -> &Delimiters {
        &self.procedural_source
    }
}

impl Default for DelimitersConfig {
    fn default() -> Self {
        Self::new(
            Delimiters::interface_description(),
            Delimiters::procedural_source(),
        )
    }
}

/// Rendering of flattened message paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotationKind {
    /// `Message.part(type).:field(type)`
    #[default]
    Dotted,
    /// Segments joined by the interface-description delimiters.
    Delimited,
}

/// Flattening configuration section.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FlattenConfig {
    #[serde(default)]
    notation: NotationKind,
}

impl FlattenConfig {
    pub fn new(notation: NotationKind) -> Self {
        Self { notation }
    }

    pub fn notation(&self) -> NotationKind {
        self.notation
    }
}
