//! Ledger Core - Core library for repo-ledger
//!
//! This crate finds local git working copies, records their `origin`
//! remotes into CSV tables, and clones them back on another machine.

pub mod config;
pub mod discovery;
pub mod error;
pub mod restore;
pub mod selector;
pub mod table;

#[cfg(test)]
mod testutil;

pub use config::{Config, RestoreConfig, ScanConfig, DEFAULT_DEPTH};
pub use discovery::{discover, find_repos, remote_url, try_remote_url, GIT_MARKER};
pub use error::{Error, Result};
pub use restore::{
    destination, is_restorable, CloneSink, CloneStatus, Cloner, GitCloner, Relocation,
    RestoreSummary, Restorer,
};
pub use selector::{
    load_records, spawn_restore_worker, Action, CloneOutcome, LoadedRecord, RestoreJob, Row,
    RowStatus, SelectorState,
};
pub use table::{
    build_fresh, list_tables, merge, table_file_name, MergeOutcome, RepoRecord, RepoTable,
};
