//! Configuration file support for hookdoc
//!
//! Loads `.hookdoc.toml` from the current directory or parent directories.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory names to exclude in addition to the built-in ignore list
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "csv" or "json"
    pub format: Option<String>,
    /// Output file path
    pub file: Option<String>,
}

impl Config {
    /// Load config from `.hookdoc.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(".hookdoc.toml");
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(concat!(
            "[paths]\n",
            "exclude = [\"third-party\", \"docs\"]\n",
            "\n",
            "[output]\n",
            "format = \"json\"\n",
            "file = \"hooks.json\"\n",
        ))
        .unwrap();
        assert_eq!(config.paths.exclude, vec!["third-party", "docs"]);
        assert_eq!(config.output.format.as_deref(), Some("json"));
        assert_eq!(config.output.file.as_deref(), Some("hooks.json"));
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.paths.exclude.is_empty());
        assert!(config.output.format.is_none());
    }

    #[test]
    fn test_load_from_finds_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let child = dir.path().join("plugin");
        std::fs::create_dir(&child).unwrap();
        std::fs::write(
            dir.path().join(".hookdoc.toml"),
            "[paths]\nexclude = [\"dist\"]\n",
        )
        .unwrap();

        let (config, path) = Config::load_from(child).unwrap().unwrap();
        assert_eq!(config.paths.exclude, vec!["dist"]);
        assert_eq!(path, dir.path().join(".hookdoc.toml"));
    }
}
