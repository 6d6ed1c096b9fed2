//! Restoring recorded repositories by cloning their remotes
//!
//! Each record is cloned into `<parent of local_path><suffix>/<repo_name>`.
//! Destinations that already exist are skipped without running git, and a
//! failed clone stops the whole batch.

mod clone;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::table::{read_records, RepoRecord};
use crate::{Error, Result};

pub use clone::{CloneSink, CloneStatus, Cloner, GitCloner, NullSink, PrintSink};

/// Where restored repositories land relative to their recorded location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relocation {
    /// Appended to each repository's parent folder name, e.g. `-testrestore`
    pub suffix: Option<String>,
}

impl Relocation {
    /// Restore into the recorded locations
    pub fn none() -> Self {
        Self::default()
    }

    /// Restore beside the recorded locations, under `<parent><suffix>`
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: Some(suffix.into()),
        }
    }
}

/// Whether a record has enough information to be cloned
pub fn is_restorable(record: &RepoRecord) -> bool {
    !record.local_path.trim().is_empty() && !record.remote_url.trim().is_empty()
}

/// Compute the directory a record is restored into
pub fn destination(record: &RepoRecord, relocation: &Relocation) -> PathBuf {
    let local = Path::new(record.local_path.trim());
    let parent = local.parent().unwrap_or_else(|| Path::new(""));

    let parent = match relocation.suffix.as_deref() {
        Some(suffix) if !suffix.is_empty() => {
            let mut relocated = OsString::from(parent.as_os_str());
            relocated.push(suffix);
            PathBuf::from(relocated)
        }
        _ => parent.to_path_buf(),
    };

    let name = record.repo_name.trim();
    if name.is_empty() {
        match local.file_name() {
            Some(file_name) => parent.join(file_name),
            None => parent,
        }
    } else {
        parent.join(name)
    }
}

/// Counts from a restore run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Repositories cloned
    pub cloned: usize,
    /// Records whose destination already existed
    pub skipped_existing: usize,
    /// Records missing a local path or remote URL
    pub skipped_incomplete: usize,
}

impl RestoreSummary {
    fn absorb(&mut self, other: RestoreSummary) {
        self.cloned += other.cloned;
        self.skipped_existing += other.skipped_existing;
        self.skipped_incomplete += other.skipped_incomplete;
    }
}

/// Sequential batch restore over a [`Cloner`]
#[derive(Debug)]
pub struct Restorer<C> {
    cloner: C,
    relocation: Relocation,
}

impl<C: Cloner> Restorer<C> {
    /// Create a restorer that clones into the recorded locations
    pub fn new(cloner: C) -> Self {
        Self {
            cloner,
            relocation: Relocation::none(),
        }
    }

    /// Relocate destinations
    pub fn with_relocation(mut self, relocation: Relocation) -> Self {
        self.relocation = relocation;
        self
    }

    /// The underlying cloner
    pub fn cloner(&self) -> &C {
        &self.cloner
    }

    /// Restore every record, stopping at the first failed clone
    pub async fn restore_records(
        &self,
        records: &[RepoRecord],
        sink: &mut dyn CloneSink,
    ) -> Result<RestoreSummary> {
        let mut summary = RestoreSummary::default();

        for record in records {
            if !is_restorable(record) {
                summary.skipped_incomplete += 1;
                continue;
            }

            let dest = destination(record, &self.relocation);
            if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::Other(format!(
                        "Failed to create parent directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }

            if dest.exists() {
                tracing::info!("Skipping existing repo: {}", dest.display());
                summary.skipped_existing += 1;
                continue;
            }

            let remote = record.remote_url.trim();
            tracing::debug!("Cloning {} to {}...", remote, dest.display());
            let status = self.cloner.clone_repo(remote, &dest, sink).await?;
            if !status.success() {
                return Err(Error::CloneFailed {
                    remote: remote.to_string(),
                    code: status.exit_code(),
                });
            }
            summary.cloned += 1;
        }

        Ok(summary)
    }

    /// Restore every table in order, stopping at the first failed clone
    pub async fn restore_tables(
        &self,
        tables: &[PathBuf],
        sink: &mut dyn CloneSink,
    ) -> Result<RestoreSummary> {
        let mut summary = RestoreSummary::default();

        for table in tables {
            tracing::info!("Restoring repos from {}...", table.display());
            let records = read_records(table)?;
            summary.absorb(self.restore_records(&records, sink).await?);
        }

        Ok(summary)
    }
}
