use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::ExportError;
use crate::db::{record_repo, Database, RecordFilter};
use crate::record::{ExtractedRecord, RecordStatus, SourceType};

/// Columns every sheet starts with; data keys follow.
pub const BASE_COLUMNS: [&str; 4] = ["id", "status", "source_type", "source_file"];

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Flattens records into rows. Data keys become columns in order of
    /// first appearance; a record without a key gets an empty cell.
    pub fn from_records<'a>(
        name: &'static str,
        records: impl IntoIterator<Item = &'a ExtractedRecord>,
    ) -> Self {
        let records: Vec<&ExtractedRecord> = records.into_iter().collect();

        let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
        for record in &records {
            for key in record.data.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                let mut row = vec![
                    record.id.to_string(),
                    record.status.to_string(),
                    record.source_type.to_string(),
                    record.source_file.clone(),
                ];
                row.extend(
                    columns[BASE_COLUMNS.len()..]
                        .iter()
                        .map(|key| record.data.get(key).cloned().unwrap_or_default()),
                );
                row
            })
            .collect();

        Self {
            name,
            columns,
            rows,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name.to_lowercase())
    }
}

/// Sheets `All`, `Forms`, `Emails`, `Invoices`, in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Writes one CSV per sheet into `dir`, creating it if needed.
    pub fn write_csv_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir).map_err(|e| ExportError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut written = Vec::with_capacity(self.sheets.len());
        for sheet in &self.sheets {
            let path = dir.join(sheet.file_name());
            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record(&sheet.columns)?;
            for row in &sheet.rows {
                wtr.write_record(row)?;
            }
            wtr.flush().map_err(|e| ExportError::Io {
                path: path.clone(),
                source: e,
            })?;
            written.push(path);
        }

        info!("Wrote {} sheets to {}", written.len(), dir.display());
        Ok(written)
    }
}

fn sheet_name(source_type: SourceType) -> &'static str {
    match source_type {
        SourceType::Form => "Forms",
        SourceType::Email => "Emails",
        SourceType::Invoice => "Invoices",
    }
}

/// Builds the workbook from every record, or only those with `status`.
/// Rows are ordered by id.
pub fn build_workbook(
    db: &Database,
    status: Option<RecordStatus>,
) -> Result<Workbook, ExportError> {
    let (mut records, _) = record_repo::query(
        db,
        &RecordFilter {
            status,
            ..Default::default()
        },
    )?;
    records.sort_by_key(|r| r.id);

    let mut sheets = vec![Sheet::from_records("All", &records)];
    for source_type in SourceType::ALL {
        sheets.push(Sheet::from_records(
            sheet_name(source_type),
            records.iter().filter(|r| r.source_type == source_type),
        ));
    }

    Ok(Workbook { sheets })
}

/// Writes the unfiltered workbook to `dir`.
pub fn write_snapshot(db: &Database, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    build_workbook(db, None)?.write_csv_dir(dir)
}
