//! Command-line argument definitions for the sigdoc CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input documents, the output path,
//! configuration file selection, path notation and logging verbosity.

use clap::{Parser, ValueEnum};

use sigdoc::config::NotationKind;

/// Command-line arguments for the sigdoc metadata tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Paths to the service description documents
    #[arg(required = true, help = "Paths to the input documents")]
    pub inputs: Vec<String>,

    /// Path to the output file, stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Path notation, overriding the configuration file
    #[arg(long, value_enum)]
    pub notation: Option<NotationArg>,
}

/// Path notations selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationArg {
    Dotted,
    Delimited,
}

impl From<NotationArg> for NotationKind {
    fn from(notation: NotationArg) -> Self {
        match notation {
            NotationArg::Dotted => NotationKind::Dotted,
            NotationArg::Delimited => NotationKind::Delimited,
        }
    }
}
