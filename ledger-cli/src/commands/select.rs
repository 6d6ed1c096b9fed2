//! Select command - Choose repositories to restore from an interactive list

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use ledger_core::{load_records, Cloner, Config, GitCloner, Relocation, SelectorState};

use crate::tui;

/// Arguments for the select command
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Folder holding repo-list-*.csv files (defaults to config, then `repos` beside the executable)
    pub data_dir: Option<PathBuf>,

    /// Append this to every repository's parent folder, e.g. `-testrestore`
    #[arg(long, env = "REPO_LEDGER_SUFFIX")]
    pub suffix: Option<String>,
}

impl SelectArgs {
    /// Execute the select command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let data_dir = self.data_dir.clone().unwrap_or_else(|| config.data_dir());
        let records = load_records(&data_dir)?;

        if records.is_empty() {
            println!("No repositories recorded in {}", data_dir.display());
            return Ok(());
        }

        let relocation = Relocation {
            suffix: self.suffix.clone().or_else(|| config.restore.suffix.clone()),
        };
        let state = SelectorState::new(records, &relocation);
        let cloner: Arc<dyn Cloner> =
            Arc::new(GitCloner::new().with_path(&config.restore.git_path));

        tui::run(state, cloner).await
    }
}
