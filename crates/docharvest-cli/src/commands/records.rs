//! List and show commands.

use clap::Args;
use docharvest::db::record_repo;
use docharvest::{Config, RecordFilter, SourceType};

use super::{open_database, StatusFilter};

#[derive(Args)]
pub struct ListArgs {
    /// Only records with this status (pending, approved, rejected, error, all)
    #[arg(short, long, default_value = "all")]
    status: StatusFilter,

    /// Only records of this source type (form, email, invoice)
    #[arg(long)]
    source: Option<SourceType>,

    /// Maximum number of records to print
    #[arg(short, long, default_value = "50")]
    limit: u64,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Record id
    id: i64,
}

pub fn list(args: ListArgs, config: &Config) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let filter = RecordFilter {
        status: args.status.0,
        source_type: args.source,
        limit: Some(args.limit),
        offset: None,
    };
    let (records, total) = record_repo::query(&db, &filter)?;

    if records.is_empty() {
        println!("No records");
        return Ok(());
    }

    println!("{:>6}  {:<9} {:<8} FILE", "ID", "STATUS", "SOURCE");
    for record in &records {
        println!(
            "{:>6}  {:<9} {:<8} {}",
            record.id, record.status, record.source_type, record.source_file
        );
    }
    println!();
    println!("Showing {} of {}", records.len(), total);
    Ok(())
}

pub fn show(args: ShowArgs, config: &Config) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let Some(record) = record_repo::find_by_id(&db, args.id)? else {
        anyhow::bail!("Record {} not found", args.id);
    };

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
