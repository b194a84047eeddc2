//! CRUD operations for the `records` table.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{params, Row};

use super::{Database, DatabaseError};
use crate::record::{ExtractedRecord, FieldMap, NewRecord, RecordStatus, SourceType};

/// Query filter parameters for record listing.
#[derive(Debug, Default, Clone)]
pub struct RecordFilter {
    pub status: Option<RecordStatus>,
    pub source_type: Option<SourceType>,
    /// `None` returns every matching row.
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ToSql for SourceType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SourceType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

impl ToSql for RecordStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecordStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Timestamps are stored as RFC 3339 text so they sort lexically.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(column)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                row.as_ref().column_index(column).unwrap_or_default(),
                Type::Text,
                Box::new(e),
            )
        })
}

fn parse_data(row: &Row<'_>) -> rusqlite::Result<FieldMap> {
    let text: String = row.get("data")?;
    serde_json::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            row.as_ref().column_index("data").unwrap_or_default(),
            Type::Text,
            Box::new(e),
        )
    })
}

fn record_from_row(row: &Row<'_>) -> Result<ExtractedRecord, rusqlite::Error> {
    Ok(ExtractedRecord {
        id: row.get("id")?,
        source_type: row.get("source_type")?,
        source_file: row.get("source_file")?,
        status: row.get("status")?,
        raw_content: row.get("raw_content")?,
        data: parse_data(row)?,
        error_message: row.get("error_message")?,
        created_at: parse_timestamp(row, "created_at")?,
        updated_at: parse_timestamp(row, "updated_at")?,
    })
}

/// Inserts a new record stamped with the current time. Returns its id.
pub fn insert(db: &Database, record: &NewRecord) -> Result<i64, DatabaseError> {
    insert_at(db, record, Utc::now())
}

/// Inserts a new record with an explicit creation time. Returns its id.
pub fn insert_at(
    db: &Database,
    record: &NewRecord,
    created_at: DateTime<Utc>,
) -> Result<i64, DatabaseError> {
    let data = serde_json::to_string(&record.data)?;
    let timestamp = format_timestamp(&created_at);

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO records (source_type, source_file, status, raw_content, data,
             error_message, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                record.source_type,
                record.source_file,
                record.status,
                record.raw_content,
                data,
                record.error_message,
                timestamp,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Whether any record was created from a file with this exact name.
pub fn exists_by_source_file(db: &Database, source_file: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM records WHERE source_file = ?1)",
            params![source_file],
            |r| r.get(0),
        )?;
        Ok(exists)
    })
}

/// Finds a record by its id.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<ExtractedRecord>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM records WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], record_from_row)?;
        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Queries records with filters, newest first, returning (rows, total_count).
pub fn query(
    db: &Database,
    filter: &RecordFilter,
) -> Result<(Vec<ExtractedRecord>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = Vec::new();
        let mut param_values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push(format!("status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status));
        }
        if let Some(source_type) = filter.source_type {
            conditions.push(format!("source_type = ?{}", param_values.len() + 1));
            param_values.push(Box::new(source_type));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM records {}", where_clause);
        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let total: u64 = conn.query_row(&count_sql, params_ref.as_slice(), |r| r.get(0))?;

        // SQLite treats a negative LIMIT as "no limit".
        let limit = filter.limit.map(|l| l as i64).unwrap_or(-1);
        let offset = filter.offset.unwrap_or(0) as i64;
        param_values.push(Box::new(limit));
        param_values.push(Box::new(offset));
        let query_sql = format!(
            "SELECT * FROM records {} ORDER BY created_at DESC, id DESC LIMIT ?{} OFFSET ?{}",
            where_clause,
            param_values.len() - 1,
            param_values.len()
        );

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&query_sql)?;
        let rows: Vec<ExtractedRecord> = stmt
            .query_map(params_ref.as_slice(), record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    })
}

/// Overwrites the mutable fields of a record: status, data, error message
/// and `updated_at`. Returns false when no record has that id.
pub fn update(db: &Database, record: &ExtractedRecord) -> Result<bool, DatabaseError> {
    let data = serde_json::to_string(&record.data)?;
    let updated_at = format_timestamp(&record.updated_at);

    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE records SET status = ?2, data = ?3, error_message = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                record.id,
                record.status,
                data,
                record.error_message,
                updated_at,
            ],
        )?;
        Ok(changed > 0)
    })
}
