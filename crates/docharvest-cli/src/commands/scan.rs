//! Scan command.

use std::sync::Arc;

use console::style;
use docharvest::pipeline::{ProgressReporter, ScanEvent};
use docharvest::{Config, Pipeline};

use super::open_database;

/// Prints one line per stored or failed file.
struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, event: ScanEvent) {
        match event {
            ScanEvent::SourceStarted { source_type, files } => {
                println!("{} {}: {} files", style("ℹ").blue(), source_type, files);
            }
            ScanEvent::Created { file, id, .. } => {
                println!("  {} {} (record {})", style("✓").green(), file, id);
            }
            ScanEvent::Failed { file, error, .. } => {
                println!("  {} {}: {}", style("✗").red(), file, error);
            }
            ScanEvent::Skipped { .. } | ScanEvent::Finished(_) => {}
        }
    }
}

pub fn run(config: &Config) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let pipeline = Pipeline::from_config(config, Arc::new(db));

    let summary = pipeline.run_full_scan_with_progress(&ConsoleProgress);

    println!();
    println!(
        "Created {}, errors {}, skipped {}",
        summary.created, summary.errors, summary.skipped
    );
    Ok(())
}
