//! Reading the `origin` remote from a working copy's git config

use std::path::Path;

use git2::{Config, ErrorCode};

use crate::Result;

use super::finder::GIT_MARKER;

const ORIGIN_URL_KEY: &str = "remote.origin.url";

/// Read the `origin` URL from `<repo_dir>/.git/config`
///
/// Returns `Ok(None)` when the config file is missing or has no
/// `[remote "origin"]` url, and an error when the file cannot be parsed.
pub fn try_remote_url(repo_dir: impl AsRef<Path>) -> Result<Option<String>> {
    let config_path = repo_dir.as_ref().join(GIT_MARKER).join("config");
    if !config_path.is_file() {
        return Ok(None);
    }

    let config = Config::open(&config_path)?;
    match config.get_string(ORIGIN_URL_KEY) {
        Ok(url) => Ok(Some(url)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read the `origin` URL, degrading every failure to an empty string
///
/// Errors are logged and swallowed.
pub fn remote_url(repo_dir: impl AsRef<Path>) -> String {
    let repo_dir = repo_dir.as_ref();
    match try_remote_url(repo_dir) {
        Ok(Some(url)) => url,
        Ok(None) => {
            tracing::info!("No remote 'origin' found for {}", repo_dir.display());
            String::new()
        }
        Err(e) => {
            tracing::warn!(
                "Failed to read remote 'origin' for {} - reason: {}",
                repo_dir.display(),
                e
            );
            String::new()
        }
    }
}
