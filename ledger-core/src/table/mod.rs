//! Repository tables persisted as `repo-list-<name>.csv`
//!
//! A table maps each working copy's local path to its record. Tables are
//! written with a fixed header and read back leniently: missing columns
//! become empty strings and rows without a local path are dropped.

mod merge;
mod record;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::{Error, Result};

pub use merge::{build_fresh, merge, MergeOutcome};
pub use record::RepoRecord;

/// Column header written at the top of every table
pub const HEADER: [&str; 3] = ["local_path", "remote_url", "repo_name"];

const TABLE_PREFIX: &str = "repo-list-";
const TABLE_EXTENSION: &str = ".csv";

/// Records keyed by local path, iterated in key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoTable {
    records: BTreeMap<String, RepoRecord>,
}

impl RepoTable {
    /// Load a table from disk
    ///
    /// A missing file is an empty table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        Ok(read_records(path)?.into_iter().collect())
    }

    /// Write the table, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_records(path, self.records())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a record exists for `local_path`
    pub fn contains(&self, local_path: &str) -> bool {
        self.records.contains_key(local_path)
    }

    /// Look up a record by local path
    pub fn get(&self, local_path: &str) -> Option<&RepoRecord> {
        self.records.get(local_path)
    }

    /// Insert a record, replacing the one stored under the same key
    pub fn upsert(&mut self, record: RepoRecord) {
        self.records.insert(record.local_path.clone(), record);
    }

    /// Iterate records in key order
    pub fn records(&self) -> impl Iterator<Item = &RepoRecord> {
        self.records.values()
    }

    /// Consume the table into its records, in key order
    pub fn into_records(self) -> Vec<RepoRecord> {
        self.records.into_values().collect()
    }
}

impl FromIterator<RepoRecord> for RepoTable {
    fn from_iter<I: IntoIterator<Item = RepoRecord>>(iter: I) -> Self {
        let mut table = Self::default();
        for record in iter {
            table.upsert(record);
        }
        table
    }
}

/// Read every row of a table file, in file order, blank fields included
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<RepoRecord>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    reader
        .deserialize::<RepoRecord>()
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Read the rows of a table file that have a `local_path`, in file order
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<RepoRecord>> {
    let path = path.as_ref();
    let mut records = read_rows(path)?;

    let before = records.len();
    records.retain(|record| !record.local_path.is_empty());
    if records.len() < before {
        tracing::debug!(
            "Skipped {} rows without local_path in {}",
            before - records.len(),
            path.display()
        );
    }

    Ok(records)
}

/// Write records under the standard header, replacing any existing file
pub fn write_records<'a>(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = &'a RepoRecord>,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;

    writer.write_record(HEADER)?;
    let mut count = 0;
    for record in records {
        writer.serialize(record)?;
        count += 1;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} records to {}", count, path.display());
    Ok(())
}

/// File name of the table recording repositories under `root`
///
/// `repo-list-<base name of root, lower-cased>.csv`; a root without a base
/// name (such as `/`) is recorded as `root`.
pub fn table_file_name(root: impl AsRef<Path>) -> String {
    let name = root
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "root".to_string());

    format!("{}{}{}", TABLE_PREFIX, name, TABLE_EXTENSION)
}

/// Every `repo-list-*.csv` file directly inside `dir`, sorted by name
pub fn list_tables(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::Config(format!(
            "Data folder does not exist: {}",
            dir.display()
        )));
    }

    let mut tables = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(TABLE_PREFIX)
            && name.ends_with(TABLE_EXTENSION)
            && entry.file_type()?.is_file()
        {
            tables.push(entry.path());
        }
    }

    tables.sort();
    Ok(tables)
}
