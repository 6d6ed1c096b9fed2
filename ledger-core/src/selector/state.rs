//! Selector state and the actions that change it

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::restore::{destination, is_restorable, Relocation};

use super::LoadedRecord;

/// Progress shown once a job has been picked up
pub const PROGRESS_STARTED: u8 = 10;
/// Progress shown once git has been launched
pub const PROGRESS_LAUNCHED: u8 = 20;
/// Progress ceiling while output is still arriving
pub const PROGRESS_CEILING: u8 = 90;
const PROGRESS_STEP: u8 = 10;
const PROGRESS_DONE: u8 = 100;

/// Lines of clone output kept for display
pub const LOG_CAPACITY: usize = 1000;

/// Where a row stands in the current restore run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// Not part of a run
    Idle,
    /// Waiting for the worker
    Queued,
    /// Being cloned
    Running,
    /// Cloned successfully
    Cloned,
    /// Destination already existed
    Skipped,
    /// Clone failed
    Failed,
}

/// One line of the selector list
#[derive(Debug, Clone)]
pub struct Row {
    /// The loaded record
    pub entry: LoadedRecord,
    /// Directory the record restores into
    pub dest: PathBuf,
    /// Whether the checkbox is ticked
    pub included: bool,
    /// Whether `dest` existed when last checked
    pub present: bool,
    /// Status in the current run
    pub status: RowStatus,
    /// Coarse progress percentage
    pub progress: u8,
}

impl Row {
    fn probe_presence(&mut self) {
        self.present = is_present(&self.entry.record.local_path, &self.dest);
    }

    fn matches(&self, needle: &str) -> bool {
        let record = &self.entry.record;
        [&record.repo_name, &record.local_path, &record.remote_url]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Work item handed to the restore worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreJob {
    /// Index of the row in [`SelectorState::rows`]
    pub row: usize,
    /// Remote to clone
    pub remote: String,
    /// Clone destination
    pub dest: PathBuf,
}

/// How a single job ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    /// The clone succeeded
    Cloned,
    /// The destination already existed
    SkippedExisting,
    /// The clone failed or could not be started
    Failed(String),
}

/// Every change the selector state accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Flip the checkbox of a row
    Toggle(usize),
    /// Tick every row
    EnableAll,
    /// Untick every row
    ClearAll,
    /// Replace the filter text
    SetFilter(String),
    /// Begin restoring the ticked rows
    StartRestore,
    /// The worker picked up a row
    WorkerStarted { row: usize },
    /// The worker reports a progress value for a row
    WorkerProgress { row: usize, percent: u8 },
    /// A line of git output for a row
    WorkerOutput { row: usize, line: String },
    /// The worker finished a row
    WorkerDone { row: usize, outcome: CloneOutcome },
    /// The worker has no more jobs
    RunFinished,
}

/// State behind the interactive selector
#[derive(Debug, Clone, Default)]
pub struct SelectorState {
    rows: Vec<Row>,
    filter: String,
    log: VecDeque<String>,
    running: bool,
    notice: Option<String>,
}

impl SelectorState {
    /// Build the state for loaded records, probing which destinations exist
    pub fn new(records: Vec<LoadedRecord>, relocation: &Relocation) -> Self {
        let rows = records
            .into_iter()
            .map(|entry| {
                let dest = destination(&entry.record, relocation);
                let present = is_present(&entry.record.local_path, &dest);
                Row {
                    entry,
                    dest,
                    included: false,
                    present,
                    status: RowStatus::Idle,
                    progress: 0,
                }
            })
            .collect();

        Self {
            rows,
            ..Self::default()
        }
    }

    /// All rows, filtered or not
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Current filter text
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Recent clone output, oldest first, at most [`LOG_CAPACITY`] lines
    pub fn log(&self) -> &VecDeque<String> {
        &self.log
    }

    /// Whether a restore run is in progress
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Message for the user from the last action, if any
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Indices of rows matching the filter, in list order
    pub fn visible_rows(&self) -> Vec<usize> {
        let needle = self.filter.trim().to_lowercase();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| needle.is_empty() || row.matches(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Rows taking part in the current or last run
    pub fn active_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.status != RowStatus::Idle)
    }

    /// Apply an action
    ///
    /// Returns the jobs to hand to the worker when the action starts a run.
    pub fn apply(&mut self, action: Action) -> Option<Vec<RestoreJob>> {
        self.notice = None;

        match action {
            Action::Toggle(i) => {
                if let Some(row) = self.rows.get_mut(i) {
                    row.included = !row.included;
                }
            }
            Action::EnableAll => self.rows.iter_mut().for_each(|row| row.included = true),
            Action::ClearAll => self.rows.iter_mut().for_each(|row| row.included = false),
            Action::SetFilter(filter) => self.filter = filter,
            Action::StartRestore => return self.start_restore(),
            Action::WorkerStarted { row } => {
                if let Some(r) = self.rows.get(row) {
                    let line = format!("Cloning {} to {}...", r.entry.record.remote_url, r.dest.display());
                    self.push_log(line);
                }
                self.update_row(row, |r| {
                    r.status = RowStatus::Running;
                    r.progress = PROGRESS_STARTED;
                });
            }
            Action::WorkerProgress { row, percent } => {
                self.update_row(row, |r| r.progress = percent.min(PROGRESS_DONE));
            }
            Action::WorkerOutput { row, line } => {
                self.push_log(line);
                self.update_row(row, |r| {
                    r.progress = r.progress.saturating_add(PROGRESS_STEP).min(PROGRESS_CEILING);
                });
            }
            Action::WorkerDone { row, outcome } => self.finish_row(row, outcome),
            Action::RunFinished => {
                self.running = false;
                self.refresh_presence();
                self.push_log("Restore complete.".to_string());
            }
        }

        None
    }

    /// Re-check which destinations exist on disk
    pub fn refresh_presence(&mut self) {
        self.rows.iter_mut().for_each(Row::probe_presence);
    }

    fn start_restore(&mut self) -> Option<Vec<RestoreJob>> {
        if self.running {
            self.notice = Some("A restore is already running.".to_string());
            return None;
        }

        if !self.rows.iter().any(|row| row.included) {
            self.notice = Some("Please select at least one repository to restore.".to_string());
            return None;
        }

        // Forget the previous run's progress
        for row in &mut self.rows {
            row.status = RowStatus::Idle;
            row.progress = 0;
        }

        let mut jobs = Vec::new();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if !row.included || row.present || !is_restorable(&row.entry.record) {
                continue;
            }
            let remote = row.entry.record.remote_url.trim();
            row.status = RowStatus::Queued;
            jobs.push(RestoreJob {
                row: i,
                remote: remote.to_string(),
                dest: row.dest.clone(),
            });
        }

        if jobs.is_empty() {
            self.notice = Some("Nothing to restore: selected repositories are already present.".to_string());
            return None;
        }

        self.running = true;
        Some(jobs)
    }

    fn finish_row(&mut self, row: usize, outcome: CloneOutcome) {
        let dest = match self.rows.get(row) {
            Some(r) => r.dest.display().to_string(),
            None => return,
        };

        match outcome {
            CloneOutcome::Cloned => {
                self.push_log(format!("  Success: {} cloned.", dest));
                self.update_row(row, |r| {
                    r.status = RowStatus::Cloned;
                    r.progress = PROGRESS_DONE;
                    r.present = true;
                });
            }
            CloneOutcome::SkippedExisting => {
                self.push_log(format!("  Skipped: {} already exists.", dest));
                self.update_row(row, |r| {
                    r.status = RowStatus::Skipped;
                    r.progress = PROGRESS_DONE;
                    r.present = true;
                });
            }
            CloneOutcome::Failed(reason) => {
                self.push_log(format!("  Error: {}", reason));
                self.update_row(row, |r| {
                    r.status = RowStatus::Failed;
                    r.progress = 0;
                });
            }
        }
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    fn update_row(&mut self, row: usize, f: impl FnOnce(&mut Row)) {
        if let Some(r) = self.rows.get_mut(row) {
            f(r);
        }
    }
}

/// A row without a recorded path has nothing on disk to find
fn is_present(local_path: &str, dest: &Path) -> bool {
    !local_path.trim().is_empty() && dest.exists()
}
