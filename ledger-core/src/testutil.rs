//! Test doubles shared by unit tests

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::restore::{CloneSink, CloneStatus, Cloner};
use crate::Result;

/// Records clone requests and fakes their outcome
///
/// Successful clones create `<dest>/.git` so later existence checks see them.
#[derive(Debug, Default)]
pub struct FakeCloner {
    calls: Mutex<Vec<(String, PathBuf)>>,
    failing_remotes: Vec<String>,
    exit_code: i32,
}

impl FakeCloner {
    /// A cloner whose every clone fails with `code`
    pub fn failing(code: i32) -> Self {
        Self {
            exit_code: code,
            failing_remotes: vec!["*".to_string()],
            ..Self::default()
        }
    }

    /// A cloner that fails only for `remote`, with exit code 128
    pub fn failing_for(remote: &str) -> Self {
        Self {
            exit_code: 128,
            failing_remotes: vec![remote.to_string()],
            ..Self::default()
        }
    }

    /// Every `(remote, dest)` requested so far
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }

    fn fails(&self, remote: &str) -> bool {
        self.failing_remotes.iter().any(|r| r == "*" || r == remote)
    }
}

#[async_trait]
impl Cloner for FakeCloner {
    async fn clone_repo(
        &self,
        remote: &str,
        dest: &Path,
        sink: &mut dyn CloneSink,
    ) -> Result<CloneStatus> {
        self.calls
            .lock()
            .unwrap()
            .push((remote.to_string(), dest.to_path_buf()));

        sink.on_start(remote, dest);
        if self.fails(remote) {
            sink.on_line("fatal: repository not found");
            return Ok(CloneStatus::exited(self.exit_code));
        }

        fs::create_dir_all(dest.join(".git"))?;
        sink.on_line(&format!("Cloning into '{}'...", dest.display()));
        sink.on_line("done.");
        Ok(CloneStatus::exited(0))
    }
}
