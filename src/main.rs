//! Command-line entry point for entity-export.

use clap::Parser;
use entity_export::{Config, Exporter, RunSummary};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "entity-export")]
#[command(author, version, about = "Fetch entities from the NerdGraph API", long_about = None)]
struct Cli {
    /// Maximum number of accounts fetched at the same time [default: 1]
    #[arg(long = "max-threads", alias = "max_threads")]
    max_threads: Option<usize>,

    /// Account configuration file (JSON)
    #[arg(short, long, default_value = "accounts.json")]
    config: PathBuf,

    /// Directory for the output files (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match run(cli).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, error_code = e.error_code(), "export failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> entity_export::Result<RunSummary> {
    let mut config = Config::from_file(&cli.config)?;
    if let Some(workers) = cli.max_threads {
        config.max_workers = workers;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    Exporter::new(config)?.run().await
}

fn print_summary(summary: &RunSummary) {
    for report in &summary.reports {
        println!(
            "\nEntity Counts by Type for account {} ({}):",
            report.account_id,
            report.account_name.as_deref().unwrap_or("Unknown Name")
        );
        for (entity_type, count) in report.type_counts.iter() {
            println!("{entity_type}: {count}");
        }
        println!(
            "Total entities fetched for account {}: {}",
            report.account_id, report.total
        );
        if let Some(failure) = &report.failure {
            println!("Fetch stopped early: {failure}");
        }
    }

    println!("\nGlobal Entity Counts by Type (All Accounts):");
    for (entity_type, count) in summary.global_counts.iter() {
        println!("{entity_type}: {count}");
    }
}
