use std::fs::{self, OpenOptions};
use std::path::Path;

use log::info;

use super::ExportError;
use crate::record::ExtractedRecord;

/// Appends `record` to the ledger CSV, following its header row.
///
/// A missing ledger is first created as a copy of `template`. Each column
/// takes the record's data value of the same name, then the metadata
/// columns `source_type`, `source_file` and `status`; any other column is
/// left empty.
pub fn append_to_ledger(
    template: &Path,
    ledger: &Path,
    record: &ExtractedRecord,
) -> Result<(), ExportError> {
    if !ledger.exists() {
        create_from_template(template, ledger)?;
    }

    let mut rdr = csv::Reader::from_path(ledger)?;
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(ExportError::EmptyTemplate(ledger.to_path_buf()));
    }

    let row: Vec<String> = columns.iter().map(|col| cell(record, col)).collect();

    let file = OpenOptions::new()
        .append(true)
        .open(ledger)
        .map_err(|e| ExportError::Io {
            path: ledger.to_path_buf(),
            source: e,
        })?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    wtr.write_record(&row)?;
    wtr.flush().map_err(|e| ExportError::Io {
        path: ledger.to_path_buf(),
        source: e,
    })?;

    info!("Appended record {} to {}", record.id, ledger.display());
    Ok(())
}

fn cell(record: &ExtractedRecord, column: &str) -> String {
    if let Some(value) = record.data.get(column) {
        return value.clone();
    }
    match column {
        "source_type" => record.source_type.to_string(),
        "source_file" => record.source_file.clone(),
        "status" => record.status.to_string(),
        _ => String::new(),
    }
}

fn create_from_template(template: &Path, ledger: &Path) -> Result<(), ExportError> {
    let mut content = fs::read_to_string(template).map_err(|e| ExportError::Io {
        path: template.to_path_buf(),
        source: e,
    })?;
    if content.trim().is_empty() {
        return Err(ExportError::EmptyTemplate(template.to_path_buf()));
    }
    if !content.ends_with('\n') {
        content.push('\n');
    }

    if let Some(parent) = ledger.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(ledger, content).map_err(|e| ExportError::Io {
        path: ledger.to_path_buf(),
        source: e,
    })?;

    info!("Ledger {} created from template", ledger.display());
    Ok(())
}
