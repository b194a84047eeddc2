pub mod export;
pub mod metrics;
pub mod records;
pub mod review;
pub mod scan;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use docharvest::{Config, Database, RecordStatus};

pub fn open_database(config: &Config) -> anyhow::Result<Database> {
    let path = Path::new(&config.database_path);
    Database::open(path).with_context(|| format!("opening database {}", path.display()))
}

pub fn output_directory(config: &Config) -> PathBuf {
    PathBuf::from(&config.export.output_directory)
}

/// `--status` value: a record status, or `all`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusFilter(pub Option<RecordStatus>);

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self(None));
        }
        s.parse().map(|status| Self(Some(status)))
    }
}
