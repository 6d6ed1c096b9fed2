//! Background worker that clones selected rows one after another

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::restore::{CloneSink, Cloner};

use super::state::{Action, CloneOutcome, RestoreJob, PROGRESS_LAUNCHED};

/// Forwards git output for one row to the UI as actions
struct ChannelSink {
    row: usize,
    tx: UnboundedSender<Action>,
}

impl CloneSink for ChannelSink {
    fn on_line(&mut self, line: &str) {
        // The UI may have quit; output is then dropped
        let _ = self.tx.send(Action::WorkerOutput {
            row: self.row,
            line: line.to_string(),
        });
    }
}

/// Spawn the restore worker for a batch of jobs
///
/// Jobs run sequentially. A failed job is reported and the next one starts.
/// `Action::RunFinished` is sent after the last job.
pub fn spawn_restore_worker(
    jobs: Vec<RestoreJob>,
    cloner: Arc<dyn Cloner>,
    tx: UnboundedSender<Action>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("Restore worker started with {} jobs", jobs.len());

        for job in jobs {
            let outcome = run_job(cloner.as_ref(), &job, &tx).await;
            if tx.send(Action::WorkerDone { row: job.row, outcome }).is_err() {
                tracing::debug!("Selector closed, stopping restore worker");
                return;
            }
        }

        let _ = tx.send(Action::RunFinished);
    })
}

async fn run_job(
    cloner: &dyn Cloner,
    job: &RestoreJob,
    tx: &UnboundedSender<Action>,
) -> CloneOutcome {
    let _ = tx.send(Action::WorkerStarted { row: job.row });

    if job.dest.exists() {
        return CloneOutcome::SkippedExisting;
    }

    if let Some(parent) = job.dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return CloneOutcome::Failed(format!(
                "Failed to create {}: {}",
                parent.display(),
                e
            ));
        }
    }

    let _ = tx.send(Action::WorkerProgress {
        row: job.row,
        percent: PROGRESS_LAUNCHED,
    });

    let mut sink = ChannelSink {
        row: job.row,
        tx: tx.clone(),
    };

    match cloner.clone_repo(&job.remote, &job.dest, &mut sink).await {
        Ok(status) if status.success() => CloneOutcome::Cloned,
        Ok(status) => {
            tracing::warn!(remote = %job.remote, code = ?status.code, "git clone failed");
            CloneOutcome::Failed(failure_message(&job.remote, status.exit_code()))
        }
        Err(e) => {
            tracing::warn!(remote = %job.remote, "git clone could not run: {}", e);
            CloneOutcome::Failed(format!("Exception cloning {}: {}", job.remote, e))
        }
    }
}

fn failure_message(remote: &str, code: i32) -> String {
    format!("Failed to clone {} (exit code {})", remote, code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeCloner;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use tokio::sync::mpsc::unbounded_channel;

    fn job(row: usize, root: &Path, name: &str) -> RestoreJob {
        RestoreJob {
            row,
            remote: format!("https://example.com/{}.git", name),
            dest: root.join("nested").join(name),
        }
    }

    async fn collect(mut rx: tokio::sync::mpsc::UnboundedReceiver<Action>) -> Vec<Action> {
        let mut actions = Vec::new();
        while let Some(action) = rx.recv().await {
            let finished = action == Action::RunFinished;
            actions.push(action);
            if finished {
                break;
            }
        }
        actions
    }

    #[tokio::test]
    async fn test_worker_clones_sequentially() {
        let temp = TempDir::new().unwrap();
        let cloner = Arc::new(FakeCloner::default());
        let (tx, rx) = unbounded_channel();

        let jobs = vec![job(0, temp.path(), "one"), job(3, temp.path(), "two")];
        spawn_restore_worker(jobs, cloner.clone(), tx).await.unwrap();
        let actions = collect(rx).await;

        assert_eq!(actions.first(), Some(&Action::WorkerStarted { row: 0 }));
        assert_eq!(actions.last(), Some(&Action::RunFinished));
        let done: Vec<_> = actions
            .iter()
            .filter_map(|a| match a {
                Action::WorkerDone { row, outcome } => Some((*row, outcome.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            done,
            vec![(0, CloneOutcome::Cloned), (3, CloneOutcome::Cloned)]
        );
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::WorkerOutput { row: 3, .. })));

        let calls = cloner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, temp.path().join("nested").join("one"));
    }

    #[tokio::test]
    async fn test_worker_continues_after_failure() {
        let temp = TempDir::new().unwrap();
        let cloner = Arc::new(FakeCloner::failing_for("https://example.com/bad.git"));
        let (tx, rx) = unbounded_channel();

        let jobs = vec![job(0, temp.path(), "bad"), job(1, temp.path(), "good")];
        spawn_restore_worker(jobs, cloner.clone(), tx).await.unwrap();
        let actions = collect(rx).await;

        assert!(actions.contains(&Action::WorkerDone {
            row: 0,
            outcome: CloneOutcome::Failed(failure_message("https://example.com/bad.git", 128)),
        }));
        assert!(actions.contains(&Action::WorkerDone {
            row: 1,
            outcome: CloneOutcome::Cloned,
        }));
        assert_eq!(cloner.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_worker_skips_existing_destination() {
        let temp = TempDir::new().unwrap();
        let existing = job(0, temp.path(), "there");
        fs::create_dir_all(&existing.dest).unwrap();

        let cloner = Arc::new(FakeCloner::default());
        let (tx, rx) = unbounded_channel();
        spawn_restore_worker(vec![existing], cloner.clone(), tx)
            .await
            .unwrap();
        let actions = collect(rx).await;

        assert!(actions.contains(&Action::WorkerDone {
            row: 0,
            outcome: CloneOutcome::SkippedExisting,
        }));
        assert!(cloner.calls().is_empty());
    }
}
