use std::path::PathBuf;

use clap::Args;
use console::style;
use docharvest::{build_workbook, Config};

use super::{open_database, output_directory, StatusFilter};

#[derive(Args)]
pub struct ExportArgs {
    /// Only records with this status (pending, approved, rejected, error, all)
    #[arg(short, long, default_value = "all")]
    status: StatusFilter,

    /// Output directory (defaults to the configured export directory)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

pub fn run(args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let out = args.out.unwrap_or_else(|| output_directory(config));

    let workbook = build_workbook(&db, args.status.0)?;
    let written = workbook.write_csv_dir(&out)?;

    for (sheet, path) in workbook.sheets.iter().zip(&written) {
        println!(
            "{} {} ({} rows) -> {}",
            style("✓").green(),
            sheet.name,
            sheet.rows.len(),
            path.display()
        );
    }
    Ok(())
}
