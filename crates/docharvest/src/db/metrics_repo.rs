//! Aggregate counts over the `records` table.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use rusqlite::params;
use serde::Serialize;

use super::{Database, DatabaseError};
use crate::record::{RecordStatus, SourceType};

/// Default width of the daily activity window.
pub const DAILY_WINDOW_DAYS: u32 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: RecordStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source_type: SourceType,
    pub count: u64,
}

/// Records created on one day, broken down by their current status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub error: u64,
}

impl DailyCount {
    pub fn get(&self, status: RecordStatus) -> u64 {
        match status {
            RecordStatus::Pending => self.pending,
            RecordStatus::Approved => self.approved,
            RecordStatus::Rejected => self.rejected,
            RecordStatus::Error => self.error,
        }
    }

    fn slot(&mut self, status: RecordStatus) -> &mut u64 {
        match status {
            RecordStatus::Pending => &mut self.pending,
            RecordStatus::Approved => &mut self.approved,
            RecordStatus::Rejected => &mut self.rejected,
            RecordStatus::Error => &mut self.error,
        }
    }

    pub fn total(&self) -> u64 {
        RecordStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Everything the dashboard summary shows.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub status_counts: Vec<StatusCount>,
    pub source_counts: Vec<SourceCount>,
    pub daily_counts: Vec<DailyCount>,
}

/// Record count per status. Every status is present, in declaration order.
pub fn status_counts(db: &Database) -> Result<Vec<StatusCount>, DatabaseError> {
    let counts = grouped_counts(db, "status")?;
    Ok(RecordStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: counts.get(status.as_str()).copied().unwrap_or(0),
        })
        .collect())
}

/// Record count per source type. Every source type is present.
pub fn source_counts(db: &Database) -> Result<Vec<SourceCount>, DatabaseError> {
    let counts = grouped_counts(db, "source_type")?;
    Ok(SourceType::ALL
        .into_iter()
        .map(|source_type| SourceCount {
            source_type,
            count: counts.get(source_type.as_str()).copied().unwrap_or(0),
        })
        .collect())
}

/// Records created per day for the `days` days ending at `today`, oldest
/// first, split by status. Days without records are reported with zeros.
pub fn daily_counts(
    db: &Database,
    today: NaiveDate,
    days: u32,
) -> Result<Vec<DailyCount>, DatabaseError> {
    if days == 0 {
        return Ok(Vec::new());
    }

    let start = today
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .unwrap_or(NaiveDate::MIN);
    let start_key = start.format("%Y-%m-%d").to_string();

    let rows: Vec<(String, RecordStatus, u64)> = db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT substr(created_at, 1, 10) AS day, status, COUNT(*) FROM records
             WHERE created_at >= ?1 GROUP BY day, status",
        )?;
        let rows = stmt
            .query_map(params![start_key], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })?;

    let mut counts: Vec<DailyCount> = start
        .iter_days()
        .take(days as usize)
        .map(|date| DailyCount {
            date,
            ..DailyCount::default()
        })
        .collect();

    for (day, status, count) in rows {
        let Ok(date) = NaiveDate::parse_from_str(&day, "%Y-%m-%d") else {
            continue;
        };
        if let Some(entry) = counts.iter_mut().find(|c| c.date == date) {
            *entry.slot(status) += count;
        }
    }

    Ok(counts)
}

/// Collects all counts for `today`'s dashboard.
pub fn snapshot(db: &Database, today: NaiveDate) -> Result<MetricsSnapshot, DatabaseError> {
    let status_counts = status_counts(db)?;
    Ok(MetricsSnapshot {
        total: status_counts.iter().map(|c| c.count).sum(),
        status_counts,
        source_counts: source_counts(db)?,
        daily_counts: daily_counts(db, today, DAILY_WINDOW_DAYS)?,
    })
}

fn grouped_counts(db: &Database, column: &str) -> Result<HashMap<String, u64>, DatabaseError> {
    let sql = format!("SELECT {column}, COUNT(*) FROM records GROUP BY {column}");
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&sql)?;
        let counts = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<HashMap<String, u64>, _>>()?;
        Ok(counts)
    })
}
