//! Interactive restore selector
//!
//! [`SelectorState`] is a plain state container changed only through
//! [`Action`]s. The restore worker runs on its own task and reports back by
//! sending actions over a channel, so the UI thread stays the only writer.

mod state;
mod worker;

use std::path::Path;

use serde::Serialize;

use crate::table::{list_tables, read_rows, RepoRecord};
use crate::Result;

pub use state::{Action, CloneOutcome, RestoreJob, Row, RowStatus, SelectorState, LOG_CAPACITY};
pub use worker::spawn_restore_worker;

/// A record together with the table file it was loaded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedRecord {
    /// The recorded repository
    #[serde(flatten)]
    pub record: RepoRecord,
    /// File name of the source table
    pub source: String,
}

/// Load every row of every `repo-list-*.csv` table in `data_dir`
///
/// Rows with a blank `local_path` or `remote_url` are kept; restoring skips them.
pub fn load_records(data_dir: impl AsRef<Path>) -> Result<Vec<LoadedRecord>> {
    let mut loaded = Vec::new();

    for table in list_tables(data_dir)? {
        let source = table
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let records = read_rows(&table)?;
        tracing::debug!("Loaded {} records from {}", records.len(), source);
        loaded.extend(records.into_iter().map(|record| LoadedRecord {
            record,
            source: source.clone(),
        }));
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::write_records;
    use tempfile::TempDir;

    #[test]
    fn test_load_records_tags_source() {
        let temp = TempDir::new().unwrap();
        write_records(
            temp.path().join("repo-list-github.csv"),
            &[
                RepoRecord::new("/g/one", "https://example.com/one.git", "one"),
                RepoRecord::new("/g/two", "", "two"),
            ],
        )
        .unwrap();
        write_records(
            temp.path().join("repo-list-gitlab.csv"),
            &[RepoRecord::new("/l/three", "https://example.com/three.git", "three")],
        )
        .unwrap();

        let loaded = load_records(temp.path()).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].source, "repo-list-github.csv");
        assert_eq!(loaded[2].source, "repo-list-gitlab.csv");
        assert_eq!(loaded[2].record.repo_name, "three");
    }

    #[test]
    fn test_load_records_keeps_incomplete_rows() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("repo-list-x.csv"),
            "local_path,remote_url,repo_name\n,https://example.com/orphan.git,orphan\n/r/y,,y\n",
        )
        .unwrap();

        let loaded = load_records(temp.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].record.repo_name, "orphan");
        assert_eq!(loaded[0].record.local_path, "");
        assert_eq!(loaded[1].record.local_path, "/r/y");
        assert_eq!(loaded[1].record.remote_url, "");
    }
}
