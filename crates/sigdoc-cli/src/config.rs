//! Locating and reading the TOML configuration of the CLI.
//!
//! An explicit `--config` path must exist. Without one, `sigdoc/config.toml`
//! in the working directory is tried, then `config.toml` in the platform
//! configuration directory; when neither exists the defaults apply.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};

use sigdoc::{
    SigdocError,
    config::{AppConfig, ConfigError},
};

const LOCAL_CONFIG: &str = "sigdoc/config.toml";

/// Loads and validates the configuration.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] for an explicit path that does not
/// exist, [`ConfigError::Parse`] for a file that is not a valid
/// configuration and [`ConfigError::Validation`] for unusable delimiters.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SigdocError> {
    let config = match explicit_path {
        Some(path) => read_config(path.as_ref(), "explicit")?,
        None => match discover() {
            Some((path, origin)) => read_config(&path, origin)?,
            None => {
                debug!("No configuration file found, using defaults");
                AppConfig::default()
            }
        },
    };
    config.validate()?;
    Ok(config)
}

/// The first existing implicit configuration file and where it was found.
fn discover() -> Option<(PathBuf, &'static str)> {
    let system = ProjectDirs::from("com", "sigdoc", "sigdoc")
        .map(|dirs| dirs.config_dir().join("config.toml"));
    if system.is_none() {
        debug!("Platform configuration directory is unknown");
    }

    [
        (Some(PathBuf::from(LOCAL_CONFIG)), "local"),
        (system, "system"),
    ]
    .into_iter()
    .filter_map(|(path, origin)| Some((path?, origin)))
    .find(|(path, origin)| {
        let found = path.is_file();
        debug!(path = path.display().to_string(), origin, found; "Probed configuration file");
        found
    })
}

fn read_config(path: &Path, origin: &str) -> Result<AppConfig, SigdocError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }
    info!(path = path.display().to_string(), origin; "Loading configuration");

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use sigdoc::config::NotationKind;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[flatten]\nnotation = \"delimited\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.flatten().notation(), NotationKind::Delimited);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(
            err,
            SigdocError::Config(ConfigError::MissingFile(missing)) if missing == path
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[flatten\nnotation = ").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, SigdocError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_delimiters_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[delimiters.interface_description]\npath = \";\"\ntype = \";\"\nnamespace = \"#\"\n",
        )
        .unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, SigdocError::Config(ConfigError::Validation(_))));
    }
}
