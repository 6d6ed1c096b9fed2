//! Repo Ledger CLI - Command line interface for repo-ledger
//!
//! Records local git repositories into CSV tables and clones them back.

mod commands;
mod tui;

use clap::{Parser, Subcommand};
use ledger_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ListArgs, RestoreArgs, ScanAllArgs, ScanArgs, SelectArgs};

/// repo-ledger: record local git repositories and restore them elsewhere
#[derive(Parser, Debug)]
#[command(name = "repo-ledger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to git executable (overrides config and env)
    #[arg(long, global = true, env = "REPO_LEDGER_GIT_PATH")]
    git_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Find repositories under a root and record them in repo-list-<name>.csv
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    /// Scan every root listed in the config file
    ScanAll(ScanAllArgs),

    /// Clone every recorded repository that is missing locally
    #[command(visible_alias = "r")]
    Restore(RestoreArgs),

    /// Pick repositories to restore from an interactive list
    Select(SelectArgs),

    /// Print recorded repositories
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show current configuration
    Config,
}

/// Filter directive for the log subscriber
///
/// The full-screen selector logs nothing, whatever `RUST_LOG` says. Other
/// commands honour `RUST_LOG`, then `--verbose`.
fn filter_directive(verbose: bool, interactive: bool, env_directive: Option<String>) -> String {
    if interactive {
        return "off".to_string();
    }
    env_directive
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| if verbose { "debug" } else { "info" }.to_string())
}

fn init_tracing(verbose: bool, interactive: bool) {
    let directive = filter_directive(
        verbose,
        interactive,
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, matches!(cli.command, Some(Commands::Select(_))));

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Batch restores exit with git's own exit code
            if let Some(ledger_core::Error::CloneFailed { code, .. }) = e.downcast_ref::<ledger_core::Error>() {
                eprintln!("Error: {:#}", e);
                std::process::exit(*code);
            }
            Err(e)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.git_path.clone(), None)?;

    if cli.verbose {
        tracing::info!(
            git_path = %config.restore.git_path,
            depth = config.scan.depth,
            data_dir = %config.data_dir().display(),
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("repo-ledger {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Scan(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::ScanAll(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Restore(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::Select(args)) => {
            args.execute(&config).await?;
        }
        Some(Commands::List(args)) => {
            args.execute(&config)?;
        }
        Some(Commands::Config) => {
            println!("Repo Ledger Configuration");
            println!("=========================");
            println!();
            println!("Scan Settings:");
            println!("  depth: {}", config.scan.depth);
            if config.scan.roots.is_empty() {
                println!("  roots: (none)");
            } else {
                println!("  roots:");
                for root in &config.scan.roots {
                    println!("    - {}", root.display());
                }
            }
            println!(
                "  output_dir: {}",
                config
                    .scan
                    .output_dir
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(data folder)".to_string())
            );
            println!();
            println!("Restore Settings:");
            println!("  data_dir: {}", config.data_dir().display());
            println!("  suffix: {}", config.restore.suffix.as_deref().unwrap_or("(none)"));
            println!("  git_path: {}", config.restore.git_path);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("repo-ledger - Record local git repositories and restore them elsewhere");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_defaults() {
        assert_eq!(filter_directive(false, false, None), "info");
        assert_eq!(filter_directive(true, false, None), "debug");
        assert_eq!(filter_directive(false, false, Some(" ".to_string())), "info");
    }

    #[test]
    fn test_filter_directive_honours_env_outside_selector() {
        assert_eq!(
            filter_directive(false, false, Some("ledger_core=trace".to_string())),
            "ledger_core=trace"
        );
    }

    #[test]
    fn test_selector_ignores_env_directive() {
        assert_eq!(filter_directive(false, true, Some("debug".to_string())), "off");
        assert_eq!(filter_directive(true, true, None), "off");
    }
}
