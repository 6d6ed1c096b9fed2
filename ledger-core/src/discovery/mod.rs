//! Repository discovery
//!
//! Walks a root directory for git working copies and reads their `origin`
//! remotes.

mod finder;
mod remote;

use std::path::Path;

use crate::table::RepoRecord;

pub use finder::{find_repos, GIT_MARKER};
pub use remote::{remote_url, try_remote_url};

/// Run one discovery pass, producing a record per repository found
///
/// Records come out in walk order. A repository whose config cannot be
/// read still yields a record, with an empty `remote_url`.
pub fn discover(root: impl AsRef<Path>, max_depth: usize) -> Vec<RepoRecord> {
    find_repos(root, max_depth)
        .into_iter()
        .map(|path| {
            let remote = remote_url(&path);
            RepoRecord::from_path(&path, remote)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo(path: &Path, origin: Option<&str>) {
        fs::create_dir_all(path.join(GIT_MARKER)).unwrap();
        let mut config = String::from("[core]\n\tbare = false\n");
        if let Some(url) = origin {
            config.push_str(&format!(
                "[remote \"origin\"]\n\turl = {}\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n",
                url
            ));
        }
        fs::write(path.join(GIT_MARKER).join("config"), config).unwrap();
    }

    #[test]
    fn test_discover_produces_records() {
        let temp = TempDir::new().unwrap();
        init_repo(&temp.path().join("alpha"), Some("https://example.com/alpha.git"));
        init_repo(&temp.path().join("group").join("beta"), None);

        let records = discover(temp.path(), 3);
        assert_eq!(records.len(), 2);

        let alpha = records.iter().find(|r| r.repo_name == "alpha").unwrap();
        assert_eq!(alpha.remote_url, "https://example.com/alpha.git");
        assert_eq!(
            alpha.local_path,
            temp.path().join("alpha").to_string_lossy()
        );

        // Missing origin still produces a record
        let beta = records.iter().find(|r| r.repo_name == "beta").unwrap();
        assert_eq!(beta.remote_url, "");
    }

    #[test]
    fn test_discover_empty_root() {
        let temp = TempDir::new().unwrap();
        assert!(discover(temp.path(), 3).is_empty());
    }
}
