//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable overriding the prompts directory
pub const PROMPTS_DIR_ENV: &str = "PROMPT_REGISTRY_DIR";

/// Directory used when nothing else is configured, relative to the working directory
pub const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Prompt registry configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding prompt documents
    pub prompts_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/prompt-registry/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read(&global_path) {
                config.merge(global);
            }
        }

        // 3. Environment variables
        if let Ok(dir) = std::env::var(PROMPTS_DIR_ENV) {
            if !dir.is_empty() {
                config.prompts_dir = Some(PathBuf::from(dir));
            }
        }

        config
    }

    /// Read a config file, ignoring files that are missing or malformed
    pub fn read(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "prompt-registry")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.prompts_dir.is_some() {
            self.prompts_dir = other.prompts_dir;
        }
    }

    /// Resolve the prompts directory, a command-line value taking precedence
    pub fn prompts_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.prompts_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPTS_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_prompts_dir() {
        let config = Config::default();
        assert_eq!(config.prompts_dir(None), PathBuf::from("prompts"));
    }

    #[test]
    fn test_cli_override_wins() {
        let config = Config {
            prompts_dir: Some(PathBuf::from("/from/config")),
        };
        assert_eq!(
            config.prompts_dir(Some(Path::new("/from/cli"))),
            PathBuf::from("/from/cli")
        );
        assert_eq!(config.prompts_dir(None), PathBuf::from("/from/config"));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut config = Config {
            prompts_dir: Some(PathBuf::from("base")),
        };
        config.merge(Config::default());
        assert_eq!(config.prompts_dir, Some(PathBuf::from("base")));

        config.merge(Config {
            prompts_dir: Some(PathBuf::from("top")),
        });
        assert_eq!(config.prompts_dir, Some(PathBuf::from("top")));
    }

    #[test]
    fn test_read_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        std::fs::write(&path, "prompts_dir: /srv/prompts\n").unwrap();
        let config = Config::read(&path).unwrap();
        assert_eq!(config.prompts_dir, Some(PathBuf::from("/srv/prompts")));

        std::fs::write(&path, "prompts_dir: [not, a, path]\n").unwrap();
        assert!(Config::read(&path).is_none());

        assert!(Config::read(&dir.path().join("missing.yaml")).is_none());
    }
}
