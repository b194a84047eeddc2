pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod parsers;
pub mod pipeline;
pub mod record;
pub mod review;
pub mod sanitize;
pub mod secrets;

pub use classifier::{EmailCategory, EmailClassifier, GuardedClassifier, NoopClassifier};
pub use config::{load_config, load_config_or_default, Config};
pub use db::{Database, DatabaseError, RecordFilter};
pub use error::{ConfigError, HarvestError, Result};
pub use export::{append_to_ledger, build_workbook, write_snapshot, ExportError, Workbook};
pub use parsers::{parse_email, parse_form, parse_invoice, EmailParser};
pub use pipeline::{Pipeline, PipelineConfig, ProgressReporter, ScanEvent, ScanSummary};
pub use record::{ExtractedRecord, FieldMap, NewRecord, RecordStatus, SourceType};
pub use review::{apply_review, review_record, ReviewAction, ReviewError, ReviewOutcome};
pub use secrets::{resolve_secret, SecretError};
