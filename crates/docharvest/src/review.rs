//! Reviewer actions on stored records.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use log::{info, warn};
use thiserror::Error;

use crate::config::ExportConfig;
use crate::db::{record_repo, Database, DatabaseError};
use crate::export::{append_to_ledger, write_snapshot};
use crate::record::{ExtractedRecord, FieldMap, RecordStatus};

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Record {0} not found")]
    NotFound(i64),

    #[error("Record {id} is {status} and can no longer be edited")]
    NotEditable { id: i64, status: RecordStatus },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// What the reviewer decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
    /// Keep the edits without a decision.
    SaveAsPending,
}

impl ReviewAction {
    pub fn target_status(&self) -> RecordStatus {
        match self {
            Self::Approve => RecordStatus::Approved,
            Self::Reject => RecordStatus::Rejected,
            Self::SaveAsPending => RecordStatus::Pending,
        }
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::SaveAsPending => "save",
        })
    }
}

impl FromStr for ReviewAction {
    type Err = String;

    /// Anything other than approve/reject saves as pending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "approve" => Self::Approve,
            "reject" => Self::Reject,
            _ => Self::SaveAsPending,
        })
    }
}

/// Replaces a record's data and moves it to the status `action` implies.
///
/// Only pending and error records can be reviewed; the stored record is left
/// untouched on failure.
pub fn review_record(
    db: &Database,
    id: i64,
    data: FieldMap,
    action: ReviewAction,
) -> Result<ExtractedRecord, ReviewError> {
    let mut record = record_repo::find_by_id(db, id)?.ok_or(ReviewError::NotFound(id))?;

    if !record.is_editable() {
        return Err(ReviewError::NotEditable {
            id,
            status: record.status,
        });
    }

    record.data = data;
    record.status = action.target_status();
    if record.status != RecordStatus::Error {
        record.error_message = None;
    }
    record.updated_at = Utc::now().max(record.created_at);

    if !record_repo::update(db, &record)? {
        return Err(ReviewError::NotFound(id));
    }

    info!("Record {} reviewed: {} -> {}", id, action, record.status);
    Ok(record)
}

/// Result of [`apply_review`].
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub record: ExtractedRecord,
    /// Ledger the record was appended to, if any.
    pub ledger: Option<PathBuf>,
}

/// Reviews a record the way the operator surface does: `edits` are merged
/// over the stored data, the workbook snapshot under
/// `<output_directory>/snapshot` is refreshed when enabled, and an approved
/// record is appended to the ledger when a template is configured.
///
/// A failed snapshot is only logged. A failed ledger append is returned,
/// although the review itself is already stored by then.
pub fn apply_review(
    db: &Database,
    id: i64,
    edits: FieldMap,
    action: ReviewAction,
    export: &ExportConfig,
) -> crate::Result<ReviewOutcome> {
    let current = record_repo::find_by_id(db, id)?.ok_or(ReviewError::NotFound(id))?;

    let mut data = current.data;
    data.extend(edits);
    let record = review_record(db, id, data, action)?;

    let output_directory = Path::new(&export.output_directory);
    if export.snapshot_on_review {
        if let Err(e) = write_snapshot(db, &output_directory.join("snapshot")) {
            warn!("Snapshot after reviewing record {} failed: {}", id, e);
        }
    }

    let mut ledger = None;
    if action == ReviewAction::Approve {
        if let Some(template) = &export.template {
            let path = output_directory.join(&export.ledger);
            append_to_ledger(Path::new(template), &path, &record)?;
            ledger = Some(path);
        }
    }

    Ok(ReviewOutcome { record, ledger })
}
