//! Review command.

use clap::{ArgGroup, Args};
use console::style;
use docharvest::{apply_review, Config, FieldMap, ReviewAction};

use super::open_database;

#[derive(Args)]
#[command(group(ArgGroup::new("action").required(true).args(["approve", "reject", "pending"])))]
pub struct ReviewArgs {
    /// Record id
    id: i64,

    /// Approve the record
    #[arg(long)]
    approve: bool,

    /// Reject the record
    #[arg(long)]
    reject: bool,

    /// Save the edits and keep the record pending
    #[arg(long)]
    pending: bool,

    /// Set a field, e.g. --set "phone=6912345678". Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    set: Vec<(String, String)>,
}

impl ReviewArgs {
    fn action(&self) -> ReviewAction {
        if self.approve {
            ReviewAction::Approve
        } else if self.reject {
            ReviewAction::Reject
        } else {
            ReviewAction::SaveAsPending
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

pub fn run(args: ReviewArgs, config: &Config) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let action = args.action();
    let edits: FieldMap = args.set.into_iter().collect();

    let outcome = apply_review(&db, args.id, edits, action, &config.export)?;
    println!(
        "{} Record {} is now {}",
        style("✓").green(),
        outcome.record.id,
        outcome.record.status
    );
    if let Some(ledger) = &outcome.ledger {
        println!("{} Appended to {}", style("✓").green(), ledger.display());
    }

    Ok(())
}
