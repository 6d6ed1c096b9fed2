//! Depth-bounded search for git working copies

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// Name of the marker subdirectory identifying a working copy
pub const GIT_MARKER: &str = ".git";

fn is_marker(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && entry.file_name() == OsStr::new(GIT_MARKER)
}

/// Find every directory under `root` that directly contains a `.git` directory
///
/// A directory deeper than `max_depth` path segments below `root` is neither
/// checked nor descended into. `.git` directories are never entered, but
/// their siblings are, so nested repositories inside the limit are found.
pub fn find_repos(root: impl AsRef<Path>, max_depth: usize) -> Vec<PathBuf> {
    let root = root.as_ref();
    let mut repos = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_marker(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable path under {:?}: {}", root, e);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if entry.path().join(GIT_MARKER).is_dir() {
            tracing::debug!(path = %entry.path().display(), depth = entry.depth(), "Found repository");
            repos.push(entry.into_path());
        }
    }

    repos
}
