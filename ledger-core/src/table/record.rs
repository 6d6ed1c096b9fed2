//! The per-repository row stored in a table

use std::path::Path;

use serde::{Deserialize, Serialize};

/// One repository as recorded in a `repo-list-*.csv` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct RepoRecord {
    /// Absolute path of the working copy; unique key within a table
    #[serde(default)]
    pub local_path: String,

    /// URL of the `origin` remote, empty when none was found
    #[serde(default)]
    pub remote_url: String,

    /// Final component of `local_path`
    #[serde(default)]
    pub repo_name: String,
}

impl RepoRecord {
    /// Create a record from its three fields
    pub fn new(
        local_path: impl Into<String>,
        remote_url: impl Into<String>,
        repo_name: impl Into<String>,
    ) -> Self {
        Self {
            local_path: local_path.into(),
            remote_url: remote_url.into(),
            repo_name: repo_name.into(),
        }
    }

    /// Build a record for a discovered working copy
    pub fn from_path(path: &Path, remote_url: impl Into<String>) -> Self {
        let repo_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            local_path: path.to_string_lossy().into_owned(),
            remote_url: remote_url.into(),
            repo_name,
        }
    }

    /// The table key
    pub fn key(&self) -> &str {
        &self.local_path
    }
}
