//! Reconciling a discovery pass with a saved table

use std::collections::HashSet;

use super::{RepoRecord, RepoTable};

/// Result of merging a discovery pass into an existing table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The merged table, ready to be saved
    pub table: RepoTable,
    /// Records whose key was not in the existing table, in discovery order
    pub newly_added: Vec<RepoRecord>,
}

/// Merge freshly discovered records into an existing table
///
/// Keys missing from `existing` are inserted and reported as new. Keys
/// already present get the freshly observed `remote_url` and `repo_name`.
/// Keys not seen in this pass are kept as they were.
pub fn merge(existing: RepoTable, discovered: impl IntoIterator<Item = RepoRecord>) -> MergeOutcome {
    let mut table = existing;
    let mut newly_added = Vec::new();

    for record in discovered {
        if !table.contains(record.key()) {
            newly_added.push(record.clone());
        }
        table.upsert(record);
    }

    MergeOutcome { table, newly_added }
}

/// Records for a fresh build: the discovery pass in discovery order
///
/// A path reported twice keeps its first occurrence.
pub fn build_fresh(discovered: impl IntoIterator<Item = RepoRecord>) -> Vec<RepoRecord> {
    let mut seen = HashSet::new();
    discovered
        .into_iter()
        .filter(|record| seen.insert(record.local_path.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn pass(records: &[(&str, &str)]) -> Vec<RepoRecord> {
        records
            .iter()
            .map(|(path, url)| RepoRecord::new(*path, *url, path.rsplit('/').next().unwrap()))
            .collect()
    }

    fn table(records: &[(&str, &str)]) -> RepoTable {
        pass(records).into_iter().collect()
    }

    fn keys(table: &RepoTable) -> BTreeSet<String> {
        table.records().map(|r| r.local_path.clone()).collect()
    }

    #[test]
    fn test_merge_updates_and_adds() {
        let existing = table(&[("/r/x", "url1")]);
        let outcome = merge(existing, pass(&[("/r/x", "url2"), ("/r/y", "url3")]));

        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.table.get("/r/x").unwrap().remote_url, "url2");
        assert_eq!(outcome.table.get("/r/y").unwrap().remote_url, "url3");
        assert_eq!(outcome.newly_added.len(), 1);
        assert_eq!(outcome.newly_added[0].local_path, "/r/y");
    }

    #[test]
    fn test_merge_keeps_unvisited_keys() {
        let existing = table(&[("/r/gone", "old"), ("/r/x", "url1")]);
        let outcome = merge(existing.clone(), pass(&[("/r/x", "url1")]));

        assert!(keys(&outcome.table).is_superset(&keys(&existing)));
        assert_eq!(outcome.table.get("/r/gone").unwrap().remote_url, "old");
        assert!(outcome.newly_added.is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let existing = table(&[("/r/a", "ua"), ("/r/b", "")]);
        let discovered = pass(&[("/r/b", "ub"), ("/r/c", "uc")]);

        let once = merge(existing, discovered.clone());
        let twice = merge(once.table.clone(), discovered);

        assert_eq!(once.table, twice.table);
        assert!(twice.newly_added.is_empty());
    }

    #[test]
    fn test_merge_into_empty_table() {
        let outcome = merge(RepoTable::default(), pass(&[("/r/b", "ub"), ("/r/a", "ua")]));
        assert_eq!(outcome.newly_added.len(), 2);
        // Discovery order is kept in the report
        assert_eq!(outcome.newly_added[0].local_path, "/r/b");
    }

    #[test]
    fn test_merge_duplicate_in_pass_reported_once() {
        let outcome = merge(
            RepoTable::default(),
            pass(&[("/r/a", "first")]).into_iter().chain(pass(&[("/r/a", "second")])),
        );
        assert_eq!(outcome.newly_added.len(), 1);
        assert_eq!(outcome.table.get("/r/a").unwrap().remote_url, "second");
    }

    #[test]
    fn test_build_fresh_keeps_order() {
        let records = build_fresh(vec![
            RepoRecord::new("/r/z", "", "z"),
            RepoRecord::new("/r/a", "", "a"),
        ]);
        assert_eq!(records[0].local_path, "/r/z");
        assert_eq!(records[1].local_path, "/r/a");
    }

    #[test]
    fn test_build_fresh_drops_repeated_paths() {
        let records = build_fresh(vec![
            RepoRecord::new("/r/z", "first", "z"),
            RepoRecord::new("/r/a", "", "a"),
            RepoRecord::new("/r/z", "second", "z"),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].remote_url, "first");
        assert_eq!(records[1].local_path, "/r/a");
    }
}
