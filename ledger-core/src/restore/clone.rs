//! Running `git clone` and streaming its output

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::{Error, Result};

/// Receiver for clone output, one line at a time
pub trait CloneSink: Send {
    /// Called before the clone process is started
    fn on_start(&mut self, _remote: &str, _dest: &Path) {}

    /// Called for each line git writes to stdout or stderr
    fn on_line(&mut self, line: &str);
}

/// Sink that prints every line to stdout
#[derive(Debug, Default)]
pub struct PrintSink;

impl CloneSink for PrintSink {
    fn on_start(&mut self, remote: &str, dest: &Path) {
        println!("Cloning {} to {}...", remote, dest.display());
    }

    fn on_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Sink that drops all output
#[derive(Debug, Default)]
pub struct NullSink;

impl CloneSink for NullSink {
    fn on_line(&mut self, _line: &str) {}
}

/// Exit status of a finished clone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneStatus {
    /// Process exit code; `None` if the process was killed by a signal
    pub code: Option<i32>,
}

impl CloneStatus {
    /// Status of a clone that exited with `code`
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether git exited with code 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code to propagate, 1 when there was none
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }
}

/// Something that can clone a remote into a local directory
#[async_trait]
pub trait Cloner: Send + Sync {
    /// Clone `remote` into `dest`, forwarding output to `sink`
    ///
    /// An unsuccessful exit is reported through the returned status; `Err`
    /// means the clone could not be run at all.
    async fn clone_repo(
        &self,
        remote: &str,
        dest: &Path,
        sink: &mut dyn CloneSink,
    ) -> Result<CloneStatus>;
}

/// Cloner backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCloner {
    git_path: String,
}

impl GitCloner {
    /// Create a cloner using `git` from PATH
    pub fn new() -> Self {
        Self {
            git_path: "git".to_string(),
        }
    }

    /// Use a custom git executable
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.git_path = path.into();
        self
    }

    /// Path of the git executable in use
    pub fn git_path(&self) -> &str {
        &self.git_path
    }
}

impl Default for GitCloner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cloner for GitCloner {
    async fn clone_repo(
        &self,
        remote: &str,
        dest: &Path,
        sink: &mut dyn CloneSink,
    ) -> Result<CloneStatus> {
        sink.on_start(remote, dest);

        let mut child = Command::new(&self.git_path)
            .arg("clone")
            .arg(remote)
            .arg(dest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::Config(format!(
                        "git executable not found at '{}'. Is git installed?",
                        self.git_path
                    ))
                } else {
                    Error::Io(e)
                }
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Other("git clone stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Other("git clone stderr was not captured".to_string()))?;

        forward_lines(stdout, stderr, sink).await?;

        let status = child.wait().await.map_err(Error::Io)?;
        tracing::debug!(remote, dest = %dest.display(), code = ?status.code(), "git clone finished");

        Ok(CloneStatus {
            code: status.code(),
        })
    }
}

/// Forward lines from both streams to `sink` as they arrive
///
/// Returns once both streams reach EOF.
async fn forward_lines<O, E>(out: O, err: E, sink: &mut dyn CloneSink) -> Result<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out = BufReader::new(out).lines();
    let mut err = BufReader::new(err).lines();
    let mut out_open = true;
    let mut err_open = true;

    while out_open || err_open {
        tokio::select! {
            line = out.next_line(), if out_open => match line.map_err(Error::Io)? {
                Some(line) => sink.on_line(&line),
                None => out_open = false,
            },
            line = err.next_line(), if err_open => match line.map_err(Error::Io)? {
                Some(line) => sink.on_line(&line),
                None => err_open = false,
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Collect(Vec<String>);

    impl CloneSink for Collect {
        fn on_line(&mut self, line: &str) {
            self.0.push(line.to_string());
        }
    }

    #[test]
    fn test_clone_status() {
        assert!(CloneStatus::exited(0).success());
        assert!(!CloneStatus::exited(128).success());
        assert_eq!(CloneStatus::exited(128).exit_code(), 128);
        assert_eq!(CloneStatus { code: None }.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_forward_lines_from_both_streams() {
        let mut sink = Collect::default();
        forward_lines(&b"one\ntwo\n"[..], &b"Cloning into 'x'...\n"[..], &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.0.len(), 3);
        assert!(sink.0.contains(&"one".to_string()));
        assert!(sink.0.contains(&"Cloning into 'x'...".to_string()));
        let one = sink.0.iter().position(|l| l == "one").unwrap();
        let two = sink.0.iter().position(|l| l == "two").unwrap();
        assert!(one < two);
    }

    #[tokio::test]
    async fn test_missing_git_executable() {
        let temp = TempDir::new().unwrap();
        let cloner = GitCloner::new().with_path("/nonexistent/bin/git-12345");

        let result = cloner
            .clone_repo("https://example.com/x.git", &temp.path().join("x"), &mut NullSink)
            .await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_clone_local_repository() {
        // Needs a git executable; skip quietly when there is none
        if std::process::Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_err()
        {
            return;
        }

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source");
        git2::Repository::init(&source).unwrap();
        let dest = temp.path().join("copy");

        let mut sink = Collect::default();
        let status = GitCloner::new()
            .clone_repo(&source.to_string_lossy(), &dest, &mut sink)
            .await
            .unwrap();

        assert!(status.success());
        assert!(dest.join(".git").is_dir());
    }

    #[tokio::test]
    async fn test_clone_failure_reports_exit_code() {
        if std::process::Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_err()
        {
            return;
        }

        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-such-repo");

        let mut sink = Collect::default();
        let status = GitCloner::new()
            .clone_repo(&missing.to_string_lossy(), &temp.path().join("copy"), &mut sink)
            .await
            .unwrap();

        assert!(!status.success());
        assert!(!sink.0.is_empty());
    }
}
