//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/lectern/config.toml)
//! 3. Environment variables (LECTERN_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::StorageKey;

/// Environment variable prefix
const ENV_PREFIX: &str = "LECTERN";

/// Title used for exports when none is configured
pub const DEFAULT_EXPORT_TITLE: &str = "Dyslexia Awareness Guide - Notes";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Directory holding bookmarks, highlights and the journal
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Lesson content as JSON; the bundled guide is used when unset
    #[serde(default)]
    pub content_path: Option<PathBuf>,

    /// Title written at the top of exports
    #[serde(default = "default_export_title")]
    pub export_title: String,

    /// Where exports are written; the current directory when unset
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Log destination when LECTERN_LOG is set; stderr when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            content_path: None,
            export_title: default_export_title(),
            export_dir: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (LECTERN_DATA_DIR, LECTERN_CONTENT, LECTERN_EXPORT_DIR)
    /// 2. Config file (~/.config/lectern/config.toml or LECTERN_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from an explicit `--config` path when given, else the default location
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // LECTERN_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // LECTERN_CONTENT
        if let Ok(val) = std::env::var(format!("{}_CONTENT", ENV_PREFIX)) {
            self.content_path = non_empty_path(val);
        }

        // LECTERN_EXPORT_DIR
        if let Ok(val) = std::env::var(format!("{}_EXPORT_DIR", ENV_PREFIX)) {
            self.export_dir = non_empty_path(val);
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with LECTERN_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lectern")
            .join("config.toml")
    }

    /// Get the path of a storage key's file
    pub fn storage_path(&self, key: StorageKey) -> PathBuf {
        self.data_dir.join(key.file_name())
    }

    pub fn bookmarks_path(&self) -> PathBuf {
        self.storage_path(StorageKey::Bookmarks)
    }

    pub fn highlights_path(&self) -> PathBuf {
        self.storage_path(StorageKey::Highlights)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.storage_path(StorageKey::Journal)
    }

    /// Directory exports are written to
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn non_empty_path(val: String) -> Option<PathBuf> {
    if val.is_empty() {
        None
    } else {
        Some(PathBuf::from(val))
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lectern")
}

fn default_export_title() -> String {
    DEFAULT_EXPORT_TITLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "LECTERN_DATA_DIR",
        "LECTERN_CONTENT",
        "LECTERN_EXPORT_DIR",
        "LECTERN_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.content_path.is_none());
        assert!(config.export_dir.is_none());
        assert_eq!(config.export_title, "Dyslexia Awareness Guide - Notes");
        assert!(config.data_dir.ends_with("lectern"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/lectern"),
            ..Config::default()
        };

        assert_eq!(
            config.bookmarks_path(),
            PathBuf::from("/data/lectern/bookmarks.json")
        );
        assert!(config.highlights_path().ends_with("highlights.json"));
        assert!(config.journal_path().ends_with("journal.md"));
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("LECTERN_DATA_DIR", "/tmp/lectern-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/lectern-test"));
    }

    #[test]
    fn test_env_override_content_and_export_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("LECTERN_CONTENT", "/srv/guide.json");
        env::set_var("LECTERN_EXPORT_DIR", "/tmp/exports");
        config.apply_env_overrides();
        assert_eq!(config.content_path, Some(PathBuf::from("/srv/guide.json")));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));

        // Empty string clears it
        env::set_var("LECTERN_CONTENT", "");
        config.apply_env_overrides();
        assert!(config.content_path.is_none());
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/lectern"),
            content_path: Some(PathBuf::from("/data/guide.json")),
            export_title: "My Notes".to_string(),
            export_dir: None,
            log_file: Some(PathBuf::from("/tmp/lectern.log")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("content_path"));
        assert!(toml_str.contains("export_title"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            export_title = "Course Notes"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.export_title, "Course Notes");
        assert!(config.content_path.is_none());
    }

    #[test]
    fn test_env_beats_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        env::set_var("LECTERN_DATA_DIR", "/from/env");
        let config = Config::load_from_str(r#"data_dir = "/from/file""#).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/env"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp = tempfile::tempdir().unwrap();
        env::set_var("LECTERN_DATA_DIR", temp.path().join("data"));

        let config = Config::load_from_path(&temp.path().join("missing.toml")).unwrap();
        // Defaults apply and the data directory is created
        assert_eq!(config.export_title, DEFAULT_EXPORT_TITLE);
        assert!(config.data_dir.is_dir());
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp.path().join("data"),
            export_title: "Saved".to_string(),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
