//! List command - Print the records stored in the data folder

use std::path::PathBuf;

use clap::Args;
use ledger_core::{is_restorable, load_records, Config};

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Folder holding repo-list-*.csv files (defaults to config, then `repos` beside the executable)
    pub data_dir: Option<PathBuf>,

    /// Print records as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let data_dir = self.data_dir.clone().unwrap_or_else(|| config.data_dir());
        let records = load_records(&data_dir)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            println!("No repositories recorded in {}", data_dir.display());
            return Ok(());
        }

        let mut current_source = None;
        for (i, loaded) in records.iter().enumerate() {
            if current_source != Some(&loaded.source) {
                println!("{}:", loaded.source);
                current_source = Some(&loaded.source);
            }

            let record = &loaded.record;
            let present = if std::path::Path::new(&record.local_path).exists() {
                "present"
            } else if is_restorable(record) {
                "missing"
            } else {
                "no remote"
            };
            println!(
                "  {:>4}  {:<30} [{}] {}",
                i + 1,
                record.repo_name,
                present,
                record.remote_url
            );
        }

        Ok(())
    }
}
