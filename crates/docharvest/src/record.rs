//! Extracted record model shared by the pipeline, the store and the review
//! surface.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field name → extracted value.
pub type FieldMap = BTreeMap<String, String>;

/// Kind of source document. Determines parser and corpus directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Form,
    Email,
    Invoice,
}

impl SourceType {
    /// All source types in scan order.
    pub const ALL: [SourceType; 3] = [SourceType::Form, SourceType::Email, SourceType::Invoice];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Email => "email",
            Self::Invoice => "invoice",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "form" => Ok(Self::Form),
            "email" => Ok(Self::Email),
            "invoice" => Ok(Self::Invoice),
            other => Err(format!("unknown source type '{}'", other)),
        }
    }
}

/// Review status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Approved,
    Rejected,
    Error,
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 4] = [
        RecordStatus::Pending,
        RecordStatus::Approved,
        RecordStatus::Rejected,
        RecordStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Error => "error",
        }
    }

    /// Only pending and error records accept reviewer edits.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Pending | Self::Error)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown record status '{}'", other)),
        }
    }
}

/// A record about to be created by the scan pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub source_type: SourceType,
    pub source_file: String,
    pub raw_content: String,
    pub status: RecordStatus,
    pub data: FieldMap,
    pub error_message: Option<String>,
}

impl NewRecord {
    /// A successfully parsed record, awaiting review.
    pub fn pending(
        source_type: SourceType,
        source_file: impl Into<String>,
        raw_content: impl Into<String>,
        data: FieldMap,
    ) -> Self {
        Self {
            source_type,
            source_file: source_file.into(),
            raw_content: raw_content.into(),
            status: RecordStatus::Pending,
            data,
            error_message: None,
        }
    }

    /// A record for a file that could not be read or persisted.
    pub fn failed(
        source_type: SourceType,
        source_file: impl Into<String>,
        raw_content: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            source_type,
            source_file: source_file.into(),
            raw_content: raw_content.into(),
            status: RecordStatus::Error,
            data: FieldMap::new(),
            error_message: Some(error_message.into()),
        }
    }
}

/// A stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRecord {
    pub id: i64,
    pub source_type: SourceType,
    pub source_file: String,
    pub status: RecordStatus,
    pub raw_content: String,
    pub data: FieldMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExtractedRecord {
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }
}

impl fmt::Display for ExtractedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.id, self.source_file, self.source_type)
    }
}
