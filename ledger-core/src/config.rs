//! Configuration management for repo-ledger
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (REPO_LEDGER_*)
//! 3. Config file (~/.config/repo-ledger/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default traversal depth below a scan root
pub const DEFAULT_DEPTH: usize = 3;

/// Discovery-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of path segments below the root that are scanned
    pub depth: usize,

    /// Roots scanned by `scan-all`
    pub roots: Vec<PathBuf>,

    /// Folder receiving `repo-list-*.csv` files for `scan-all`
    pub output_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            roots: Vec::new(),
            output_dir: None,
        }
    }
}

/// Restore-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Folder holding the `repo-list-*.csv` tables to restore from
    pub data_dir: Option<PathBuf>,

    /// Appended to each repository's parent folder (for trial restores)
    pub suffix: Option<String>,

    /// Path to the git executable
    pub git_path: String,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            suffix: None,
            git_path: "git".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Scan configuration
    pub scan: ScanConfig,

    /// Restore configuration
    pub restore: RestoreConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/repo-ledger/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("repo-ledger").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - REPO_LEDGER_GIT_PATH: Path to git executable
    /// - REPO_LEDGER_DATA_DIR: Folder holding CSV tables
    /// - REPO_LEDGER_SUFFIX: Suffix appended to restore parents
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(git_path) = std::env::var("REPO_LEDGER_GIT_PATH") {
            self.restore.git_path = git_path;
        }

        if let Ok(data_dir) = std::env::var("REPO_LEDGER_DATA_DIR") {
            self.restore.data_dir = Some(PathBuf::from(data_dir));
        }

        if let Ok(suffix) = std::env::var("REPO_LEDGER_SUFFIX") {
            self.restore.suffix = Some(suffix);
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, git_path: Option<String>, suffix: Option<String>) -> Self {
        if let Some(path) = git_path {
            self.restore.git_path = path;
        }

        if let Some(s) = suffix {
            self.restore.suffix = Some(s);
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(git_path: Option<String>, suffix: Option<String>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(git_path, suffix))
    }

    /// Folder holding CSV tables, falling back to `repos` beside the executable
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.restore.data_dir {
            return dir.clone();
        }

        exe_dir().join("repos")
    }
}

/// Directory containing the running executable, or `.` if it cannot be determined
pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
