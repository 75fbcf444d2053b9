use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::{io::IsTerminal, path::PathBuf};

use sales_total::{calculate_total, total_file, DEFAULT_PATTERN};

/// Sum the values from the 'amount' column across CSV files.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Total this one CSV file instead of scanning the data directory
    #[arg(conflicts_with_all = ["pattern", "data_dir"])]
    path: Option<PathBuf>,

    /// Glob pattern used to select CSV files within the data directory
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Directory searched recursively for CSV files
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Log each file and its subtotal to standard error
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default = if verbose { "sales_total=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);
    if let Some(path) = args.path {
        let file = total_file(&path)?;
        println!("Total amount: {}", file.total.rounded());
    } else {
        let totals = calculate_total(&args.data_dir, &args.pattern)?;
        println!("Total sales: {}", totals.total);
    }
    Ok(())
}
