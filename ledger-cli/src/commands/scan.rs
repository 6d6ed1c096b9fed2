//! Scan command - Record repositories found under a root folder

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use ledger_core::config::exe_dir;
use ledger_core::table::write_records;
use ledger_core::{build_fresh, discover, merge, table_file_name, Config, RepoRecord, RepoTable};

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root folder to search (defaults to the folder holding this executable)
    pub root: Option<PathBuf>,

    /// How many folder levels below the root to search [default: 3]
    pub depth: Option<String>,

    /// Folder receiving the CSV file (defaults to the root folder)
    pub output: Option<PathBuf>,

    /// Replace the table with this scan instead of merging into it
    #[arg(long)]
    pub fresh: bool,
}

/// What a single scan wrote
#[derive(Debug)]
pub struct ScanReport {
    /// Table file written
    pub table_path: PathBuf,
    /// Records now in the table
    pub total: usize,
    /// Records not present before this scan
    pub newly_added: Vec<RepoRecord>,
}

impl ScanArgs {
    /// Execute the scan command
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => {
                print_usage();
                exe_dir()
            }
        };

        let depth = parse_depth(self.depth.as_deref(), config.scan.depth);
        let report = scan_root(&root, depth, self.output.as_deref(), self.fresh)?;
        print_report(&report, self.fresh);

        Ok(())
    }
}

fn print_usage() {
    println!("Usage: repo-ledger scan <path-to-root-folder> [max-levels] [output-folder]");
    println!("No path provided. Defaulting to the folder holding this executable.");
    println!("Finds all git repos up to N levels deep (default 3), reads their remote URLs, and writes repo-list-<name>.csv with local path, remote URL, and repo name.");
    println!("You can optionally specify max-levels and an output folder for the CSV file.");
}

/// Parse the depth argument, warning and falling back to `default` when invalid
pub fn parse_depth(arg: Option<&str>, default: usize) -> usize {
    match arg {
        None => default,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(depth) => depth,
            Err(_) => {
                tracing::warn!(
                    "Invalid max-levels argument '{}', using default {}.",
                    raw,
                    default
                );
                default
            }
        },
    }
}

/// Scan `root` and write its table into `output` (or `root` when absent)
pub fn scan_root(
    root: &Path,
    depth: usize,
    output: Option<&Path>,
    fresh: bool,
) -> anyhow::Result<ScanReport> {
    let root = std::fs::canonicalize(root)
        .with_context(|| format!("Root folder not found: {}", root.display()))?;

    let output = match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output folder {}", dir.display()))?;
            std::fs::canonicalize(dir)?
        }
        None => root.clone(),
    };

    let table_path = output.join(table_file_name(&root));
    tracing::debug!(root = %root.display(), depth, table = %table_path.display(), fresh, "Scanning");

    let discovered = discover(&root, depth);

    if fresh {
        let records = build_fresh(discovered);
        write_records(&table_path, &records)
            .with_context(|| format!("Failed to write {}", table_path.display()))?;
        return Ok(ScanReport {
            table_path,
            total: records.len(),
            newly_added: records,
        });
    }

    let existing = RepoTable::load(&table_path)
        .with_context(|| format!("Failed to read existing table {}", table_path.display()))?;
    let outcome = merge(existing, discovered);
    outcome
        .table
        .save(&table_path)
        .with_context(|| format!("Failed to write {}", table_path.display()))?;

    Ok(ScanReport {
        table_path,
        total: outcome.table.len(),
        newly_added: outcome.newly_added,
    })
}

/// Print the outcome of a scan
pub fn print_report(report: &ScanReport, fresh: bool) {
    println!("CSV file written: {}", report.table_path.display());

    if fresh {
        println!("Recorded {} repos.", report.total);
        return;
    }

    if report.newly_added.is_empty() {
        println!("No new repos added.");
    } else {
        println!("Newly added repos:");
        for repo in &report.newly_added {
            println!(
                "  {} | {} | {}",
                repo.local_path, repo.remote_url, repo.repo_name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::table::read_records;
    use std::fs;
    use tempfile::TempDir;

    fn make_repo(root: &Path, rel: &str, url: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.join(".git")).unwrap();
        fs::write(
            path.join(".git").join("config"),
            format!("[remote \"origin\"]\n\turl = {}\n", url),
        )
        .unwrap();
        fs::canonicalize(path).unwrap()
    }

    /// `Projects/alpha` and `Projects/group/beta`, plus an older table in `out`
    /// recording a repository that no longer exists
    fn fixture() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Projects");
        make_repo(&root, "alpha", "https://example.com/alpha.git");
        make_repo(&root, "group/beta", "https://example.com/beta.git");

        let out = temp.path().join("out");
        fs::create_dir_all(&out).unwrap();
        write_records(
            out.join("repo-list-projects.csv"),
            &[RepoRecord::new("/gone/old", "https://example.com/old.git", "old")],
        )
        .unwrap();

        (temp, root, out)
    }

    #[test]
    fn test_fresh_scan_replaces_existing_table() {
        let (_temp, root, out) = fixture();

        let report = scan_root(&root, 3, Some(&out), true).unwrap();
        assert_eq!(report.table_path.file_name().unwrap(), "repo-list-projects.csv");
        assert_eq!(report.total, 2);

        let records = read_records(&report.table_path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.local_path != "/gone/old"));
    }

    #[test]
    fn test_merge_scan_keeps_unvisited_rows() {
        let (_temp, root, out) = fixture();
        let root_canon = fs::canonicalize(&root).unwrap();

        let report = scan_root(&root, 3, Some(&out), false).unwrap();
        assert_eq!(report.total, 3);

        let table = RepoTable::load(&report.table_path).unwrap();
        assert!(table.contains("/gone/old"));
        let beta = root_canon.join("group").join("beta");
        let beta = table.get(&beta.to_string_lossy()).unwrap();
        assert_eq!(beta.remote_url, "https://example.com/beta.git");
        assert_eq!(beta.repo_name, "beta");

        let mut added: Vec<_> = report.newly_added.iter().map(|r| r.repo_name.as_str()).collect();
        added.sort();
        assert_eq!(added, vec!["alpha", "beta"]);

        // Nothing new the second time round
        let again = scan_root(&root, 3, Some(&out), false).unwrap();
        assert!(again.newly_added.is_empty());
        assert_eq!(again.total, 3);
    }

    #[test]
    fn test_scan_creates_output_folder() {
        let (temp, root, _out) = fixture();
        let nested = temp.path().join("data").join("tables");

        let report = scan_root(&root, 3, Some(&nested), false).unwrap();
        assert!(nested.is_dir());
        assert!(report.table_path.is_file());
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_scan_writes_beside_root_by_default() {
        let (_temp, root, _out) = fixture();

        let report = scan_root(&root, 1, None, false).unwrap();
        assert_eq!(
            report.table_path,
            fs::canonicalize(&root).unwrap().join("repo-list-projects.csv")
        );
        // depth 1 reaches alpha but not group/beta
        assert_eq!(report.total, 1);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        assert!(scan_root(&temp.path().join("absent"), 3, None, false).is_err());
    }

    #[test]
    fn test_parse_depth() {
        assert_eq!(parse_depth(None, 3), 3);
        assert_eq!(parse_depth(Some("5"), 3), 5);
        assert_eq!(parse_depth(Some(" 0 "), 3), 0);
        assert_eq!(parse_depth(Some("deep"), 3), 3);
        assert_eq!(parse_depth(Some("-1"), 3), 3);
    }
}
