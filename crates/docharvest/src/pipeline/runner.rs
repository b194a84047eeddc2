use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use crate::classifier;
use crate::config::Config;
use crate::parsers::{parse_form, parse_invoice, EmailParser};
use crate::record::{FieldMap, NewRecord, SourceType};
use crate::sanitize;

use super::config::{PipelineConfig, SourceSpec};
use super::error::PipelineError;
use super::progress::{NoopProgress, ProgressReporter, ScanEvent};
use super::scanner::list_source_files;
use super::store::RecordStore;

/// Counts from one full scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Records created with status `pending`.
    pub created: usize,
    /// Files that ended in an `error` record (or failed to get one).
    pub errors: usize,
    /// Files already known by name.
    pub skipped: usize,
}

enum FileOutcome {
    Created(i64),
    Skipped,
    Failed(String),
}

pub struct Pipeline {
    config: PipelineConfig,
    store: Arc<dyn RecordStore>,
    email_parser: EmailParser,
}

impl Pipeline {
    /// Corpus layout and classifier taken from `config`.
    pub fn from_config(config: &Config, store: Arc<dyn RecordStore>) -> Self {
        let email_parser = EmailParser::with_classifier(classifier::from_config(&config.classifier));
        Self::new(PipelineConfig::from_config(config), store, email_parser)
    }

    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn RecordStore>,
        email_parser: EmailParser,
    ) -> Self {
        Self {
            config,
            store,
            email_parser,
        }
    }

    /// Scans every source directory and persists one record per new file.
    ///
    /// Per-file failures are recorded and counted, never returned.
    pub fn run_full_scan(&self) -> ScanSummary {
        self.run_full_scan_with_progress(&NoopProgress)
    }

    pub fn run_full_scan_with_progress(&self, progress: &dyn ProgressReporter) -> ScanSummary {
        let _scan_span = info_span!("scan").entered();
        let mut summary = ScanSummary::default();

        for source in &self.config.sources {
            self.scan_source(source, &mut summary, progress);
        }

        info!(
            created = summary.created,
            errors = summary.errors,
            skipped = summary.skipped,
            "Scan finished"
        );
        progress.report(ScanEvent::Finished(summary));
        summary
    }

    fn scan_source(
        &self,
        source: &SourceSpec,
        summary: &mut ScanSummary,
        progress: &dyn ProgressReporter,
    ) {
        let _source_span = info_span!("source", source_type = %source.source_type).entered();

        let files = match list_source_files(&source.directory, &source.pattern) {
            Ok(files) => files,
            Err(e) => {
                warn!("Skipping {} sources: {}", source.source_type, e);
                return;
            }
        };

        debug!(files = files.len(), "Listed source files");
        progress.report(ScanEvent::SourceStarted {
            source_type: source.source_type,
            files: files.len(),
        });

        for path in files {
            let file = file_name(&path);
            let event = match self.process_file(source.source_type, &path, &file) {
                FileOutcome::Created(id) => {
                    summary.created += 1;
                    ScanEvent::Created {
                        source_type: source.source_type,
                        file,
                        id,
                    }
                }
                FileOutcome::Skipped => {
                    summary.skipped += 1;
                    ScanEvent::Skipped {
                        source_type: source.source_type,
                        file,
                    }
                }
                FileOutcome::Failed(error) => {
                    summary.errors += 1;
                    ScanEvent::Failed {
                        source_type: source.source_type,
                        file,
                        error,
                    }
                }
            };
            progress.report(event);
        }
    }

    fn process_file(&self, source_type: SourceType, path: &Path, file: &str) -> FileOutcome {
        let _file_span = info_span!("file", file = %sanitize::redact_path(path)).entered();

        match self.store.exists(file) {
            Ok(true) => {
                debug!("Already imported, skipping");
                return FileOutcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => return self.record_failure(source_type, file, "", e.into()),
        }

        let raw = match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                let err = PipelineError::Read {
                    path: path.to_path_buf(),
                    source: e,
                };
                return self.record_failure(source_type, file, "", err);
            }
        };

        let data = self.parse(source_type, &raw);
        let record = NewRecord::pending(source_type, file, raw, data);

        match self.store.create(&record) {
            Ok(id) => {
                debug!(id, fields = record.data.len(), "Record created");
                FileOutcome::Created(id)
            }
            Err(e) => self.record_failure(source_type, file, &record.raw_content, e.into()),
        }
    }

    fn parse(&self, source_type: SourceType, raw: &str) -> FieldMap {
        match source_type {
            SourceType::Form => parse_form(raw),
            SourceType::Email => self.email_parser.parse(raw),
            SourceType::Invoice => parse_invoice(raw),
        }
    }

    fn record_failure(
        &self,
        source_type: SourceType,
        file: &str,
        raw: &str,
        err: PipelineError,
    ) -> FileOutcome {
        let message = err.to_string();
        warn!("Failed to import: {}", message);

        let record = NewRecord::failed(source_type, file, raw, message.clone());
        if let Err(e) = self.store.create(&record) {
            error!("Could not persist error record: {}", e);
        }

        FileOutcome::Failed(message)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
