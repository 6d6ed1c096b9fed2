//! Restore command - Clone every recorded repository missing on this machine

use std::path::PathBuf;

use clap::Args;
use ledger_core::restore::PrintSink;
use ledger_core::{list_tables, Config, GitCloner, Relocation, Restorer};

/// Arguments for the restore command
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Folder holding repo-list-*.csv files (defaults to config, then `repos` beside the executable)
    pub data_dir: Option<PathBuf>,

    /// Append this to every repository's parent folder, e.g. `-testrestore`
    #[arg(long, env = "REPO_LEDGER_SUFFIX")]
    pub suffix: Option<String>,
}

impl RestoreArgs {
    /// Execute the restore command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let data_dir = self.data_dir.clone().unwrap_or_else(|| config.data_dir());
        let tables = list_tables(&data_dir)?;

        if tables.is_empty() {
            println!("No repo-list-*.csv files found in {}", data_dir.display());
            return Ok(());
        }

        let relocation = Relocation {
            suffix: self.suffix.clone().or_else(|| config.restore.suffix.clone()),
        };
        let restorer = Restorer::new(GitCloner::new().with_path(&config.restore.git_path))
            .with_relocation(relocation);

        let summary = restorer.restore_tables(&tables, &mut PrintSink).await?;

        println!("Restore complete.");
        println!(
            "  {} cloned, {} already present, {} incomplete rows skipped",
            summary.cloned, summary.skipped_existing, summary.skipped_incomplete
        );

        Ok(())
    }
}
