//! Scan-all command - Scan every configured root into the data folder

use std::path::PathBuf;

use clap::Args;
use ledger_core::Config;

use super::scan::{parse_depth, print_report, scan_root};

/// Arguments for the scan-all command
#[derive(Args, Debug)]
pub struct ScanAllArgs {
    /// Folder receiving the CSV files (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How many folder levels below each root to search
    #[arg(short, long)]
    pub depth: Option<String>,
}

impl ScanAllArgs {
    /// Execute the scan-all command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        if config.scan.roots.is_empty() {
            let path = Config::default_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the config file".to_string());
            anyhow::bail!("No scan roots configured. Add `roots = [...]` under [scan] in {}", path);
        }

        let output = self
            .output
            .clone()
            .or_else(|| config.scan.output_dir.clone())
            .unwrap_or_else(|| config.data_dir());
        let depth = parse_depth(self.depth.as_deref(), config.scan.depth);

        for root in &config.scan.roots {
            println!("Processing {}...", root.display());
            let report = scan_root(root, depth, Some(&output), false)?;
            print_report(&report, false);
        }

        println!("CSV files created for all folders in {}", output.display());
        Ok(())
    }
}
