use crate::record::SourceType;

use super::runner::ScanSummary;

/// Events emitted while a scan runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    SourceStarted {
        source_type: SourceType,
        files: usize,
    },
    Created {
        source_type: SourceType,
        file: String,
        id: i64,
    },
    Skipped {
        source_type: SourceType,
        file: String,
    },
    Failed {
        source_type: SourceType,
        file: String,
        error: String,
    },
    Finished(ScanSummary),
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ScanEvent);
}

/// No-op reporter for callers that only need the summary.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ScanEvent) {}
}
