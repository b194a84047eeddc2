use chrono::Utc;
use docharvest::db::metrics_repo;
use docharvest::Config;

use super::open_database;

pub fn run(config: &Config) -> anyhow::Result<()> {
    let db = open_database(config)?;
    let snapshot = metrics_repo::snapshot(&db, Utc::now().date_naive())?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
