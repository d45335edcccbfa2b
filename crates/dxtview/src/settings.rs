//! Optional settings file supplying defaults the CLI does not override.
//!
//! The file lives at `<config>/settings.toml` and tolerates being absent or
//! sparse; every field is optional:
//!
//! ```toml
//! fit = "contain"
//! antialias = "4"
//! browse_dir = "~/textures"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use renderer::{Antialiasing, FitMode};

use crate::cli;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub fit: Option<String>,
    #[serde(default)]
    pub antialias: Option<String>,
    #[serde(default)]
    pub browse_dir: Option<PathBuf>,
}

impl Settings {
    /// Loads the settings file; a missing file yields defaults, a malformed
    /// one is an error the user should see.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings at {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid settings file at {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse settings TOML")
    }

    /// Fit mode from the settings file, validated with the CLI parser so both
    /// sources accept the same spellings.
    pub fn fit(&self) -> Result<Option<FitMode>> {
        self.fit
            .as_deref()
            .map(cli::parse_fit)
            .transpose()
            .map_err(anyhow::Error::msg)
    }

    pub fn antialias(&self) -> Result<Option<Antialiasing>> {
        self.antialias
            .as_deref()
            .map(cli::parse_antialias)
            .transpose()
            .map_err(anyhow::Error::msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_settings() {
        let settings = Settings::from_toml_str(
            r#"
fit = "contain"
antialias = "4"
browse_dir = "/data/textures"
"#,
        )
        .unwrap();
        assert_eq!(settings.fit().unwrap(), Some(FitMode::Contain));
        assert_eq!(settings.antialias().unwrap(), Some(Antialiasing::Samples(4)));
        assert_eq!(settings.browse_dir, Some(PathBuf::from("/data/textures")));
    }

    #[test]
    fn sparse_settings_default_to_none() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.fit().unwrap(), None);
        assert_eq!(settings.antialias().unwrap(), None);
        assert!(settings.browse_dir.is_none());
    }

    #[test]
    fn invalid_fit_value_is_reported() {
        let settings = Settings::from_toml_str(r#"fit = "sideways""#).unwrap();
        let err = settings.fit().unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("settings.toml")).unwrap();
        assert!(settings.fit.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "fit = [not toml").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
