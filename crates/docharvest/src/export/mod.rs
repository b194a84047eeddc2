//! Spreadsheet export.
//!
//! Workbooks are written as one CSV file per sheet; the ledger is a single
//! CSV that approved records are appended to.

pub mod ledger;
pub mod workbook;

use std::path::PathBuf;

use thiserror::Error;

pub use ledger::append_to_ledger;
pub use workbook::{build_workbook, write_snapshot, Sheet, Workbook};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Template '{0}' has no header row")]
    EmptyTemplate(PathBuf),

    #[error(transparent)]
    Database(#[from] crate::db::DatabaseError),
}
