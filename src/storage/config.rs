//! Application configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which storage backend the gym runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Volatile, lost on exit
    Memory,
    /// Trainers and locations in delimited text files, everything else in memory
    File,
    /// SQLite database (default)
    #[default]
    Sqlite,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::File => write!(f, "file"),
            BackendKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Storage settings
    pub storage: StorageSettings,
}

impl Default for GymConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            storage: StorageSettings::default(),
        }
    }
}

impl GymConfig {
    /// Path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.database_file)
    }

    /// Directory holding the flat record files.
    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage.records_dir)
    }
}

/// Storage-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Backend to use
    pub backend: BackendKind,
    /// Database file name, relative to the data directory
    pub database_file: String,
    /// Record directory name, relative to the data directory
    pub records_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            database_file: "gym.db".to_string(),
            records_dir: "records".to_string(),
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "gymdesk", "GymDesk")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<GymConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load configuration from `path`; a missing file yields defaults.
///
/// `data_dir` is set to the file's directory.
pub fn load_config_from(path: &Path) -> Result<GymConfig, ConfigError> {
    let data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if !path.exists() {
        return Ok(GymConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: GymConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &GymConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save configuration to `path`.
pub fn save_config_to(config: &GymConfig, path: &Path) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.storage.backend, BackendKind::Sqlite);
        assert_eq!(config.database_path(), dir.path().join("gym.db"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = GymConfig::default();
        config.storage.backend = BackendKind::File;
        config.storage.records_dir = "flat".to_string();
        save_config_to(&config, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.storage.backend, BackendKind::File);
        assert_eq!(loaded.records_path(), dir.path().join("flat"));
    }

    #[test]
    fn test_partial_storage_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "version = \"0.1.0\"\n\n[storage]\nbackend = \"memory\"\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.storage.backend, BackendKind::Memory);
        assert_eq!(loaded.storage.database_file, "gym.db");
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "storage = [").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::ParseError(_))));
    }
}
