//! Command-line front end: scan the corpus, review records, export them.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{export, metrics, records, review, scan};

/// Extract fields from forms, emails and invoices and review them
#[derive(Parser)]
#[command(name = "docharvest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true, default_value = "docharvest.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the corpus and store a record for every new file
    Scan,

    /// List stored records, newest first
    List(records::ListArgs),

    /// Print one record as JSON
    Show(records::ShowArgs),

    /// Edit a record and approve, reject or keep it pending
    Review(review::ReviewArgs),

    /// Write the records workbook as CSV files
    Export(export::ExportArgs),

    /// Print record counts as JSON
    Metrics,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let config = docharvest::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Scan => scan::run(&config),
        Commands::List(args) => records::list(args, &config),
        Commands::Show(args) => records::show(args, &config),
        Commands::Review(args) => review::run(args, &config),
        Commands::Export(args) => export::run(args, &config),
        Commands::Metrics => metrics::run(&config),
    }
}

/// `RUST_LOG` wins; otherwise `-v` picks the level. Logs go to stderr so
/// JSON output on stdout stays parseable.
fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_log::LogTracer::init()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
