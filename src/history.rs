// 🗂️ Calculation journal - SQLite record of every calculation run
//
// Records are append-only. Identity is a UUID per record; the fingerprint
// (SHA-256 of request + result) is for deduplication, so running the same
// calculation twice with the same answer is stored once.

use crate::request::{CalculationOutcome, CalculationRequest};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalculationRecord {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub calculator: String,
    pub request: serde_json::Value,
    pub result: serde_json::Value,
    pub fingerprint: String,
}

impl CalculationRecord {
    pub fn new(request: &CalculationRequest, outcome: &CalculationOutcome) -> Result<Self> {
        let request = serde_json::to_value(request).context("Failed to serialize request")?;
        let result = serde_json::to_value(&outcome.result).context("Failed to serialize result")?;
        let fingerprint = compute_fingerprint(&request, &result);

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            recorded_at: Utc::now(),
            calculator: outcome.calculator.clone(),
            request,
            result,
            fingerprint,
        })
    }
}

/// Deduplication hash over the request and its result
pub fn compute_fingerprint(request: &serde_json::Value, result: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(request.to_string());
    hasher.update(b"\n");
    hasher.update(result.to_string());
    format!("{:x}", hasher.finalize())
}

/// Open (creating if needed) the journal at `path`
pub fn open_journal(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create journal directory: {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open journal: {}", path.display()))?;
    setup_database(&conn)?;

    info!(path = %path.display(), "calculation journal opened");
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL for crash recovery; in-memory databases report "memory" and that is fine
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS calculations (
            id TEXT PRIMARY KEY,
            recorded_at TEXT NOT NULL,
            calculator TEXT NOT NULL,
            request TEXT NOT NULL,
            result TEXT NOT NULL,
            fingerprint TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_calculations_calculator ON calculations(calculator)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_calculations_recorded_at ON calculations(recorded_at)",
        [],
    )?;

    Ok(())
}

/// Returns false when an identical calculation is already recorded
pub fn record_calculation(conn: &Connection, record: &CalculationRecord) -> Result<bool> {
    let result = conn.execute(
        "INSERT INTO calculations (id, recorded_at, calculator, request, result, fingerprint)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id,
            // Fixed width so text order is time order
            record.recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            record.calculator,
            record.request.to_string(),
            record.result.to_string(),
            record.fingerprint,
        ],
    );

    match result {
        Ok(_) => {
            debug!(calculator = %record.calculator, id = %record.id, "calculation recorded");
            Ok(true)
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            debug!(calculator = %record.calculator, "duplicate calculation skipped");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn record_from_row(row: &Row) -> rusqlite::Result<CalculationRecord> {
    let recorded_at: String = row.get(1)?;
    let request_json: String = row.get(3)?;
    let result_json: String = row.get(4)?;

    Ok(CalculationRecord {
        id: row.get(0)?,
        recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)))?
            .with_timezone(&Utc),
        calculator: row.get(2)?,
        request: serde_json::from_str(&request_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e)))?,
        result: serde_json::from_str(&result_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e)))?,
        fingerprint: row.get(5)?,
    })
}

/// Newest first
pub fn recent_calculations(conn: &Connection, limit: usize) -> Result<Vec<CalculationRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, recorded_at, calculator, request, result, fingerprint
         FROM calculations
         ORDER BY recorded_at DESC, rowid DESC
         LIMIT ?1",
    )?;

    let records = stmt
        .query_map([limit as i64], record_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

pub fn calculations_for(conn: &Connection, calculator: &str) -> Result<Vec<CalculationRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, recorded_at, calculator, request, result, fingerprint
         FROM calculations
         WHERE calculator = ?1
         ORDER BY recorded_at DESC, rowid DESC",
    )?;

    let records = stmt
        .query_map([calculator], record_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

pub fn count_calculations(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM calculations", [], |row| row.get(0))?;

    Ok(count)
}

/// Delete every record, returning how many were removed
pub fn clear_history(conn: &Connection) -> Result<usize> {
    let removed = conn.execute("DELETE FROM calculations", [])?;
    info!(removed, "calculation history cleared");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::{GstInput, GstMode, GoldInput};

    fn record_for(request: CalculationRequest) -> CalculationRecord {
        let outcome = request.run().unwrap();
        CalculationRecord::new(&request, &outcome).unwrap()
    }

    fn memory_journal() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    #[test]
    fn test_record_twice_is_idempotent() {
        let conn = memory_journal();
        let gst = || CalculationRequest::Gst(GstInput::new(1000.0, 18.0, GstMode::Exclusive));

        assert!(record_calculation(&conn, &record_for(gst())).unwrap());
        // Fresh UUID, same fingerprint
        assert!(!record_calculation(&conn, &record_for(gst())).unwrap());

        assert_eq!(count_calculations(&conn).unwrap(), 1);
        println!("✅ Journal idempotency test PASSED");
    }

    #[test]
    fn test_recent_and_filtered() {
        let conn = memory_journal();

        for rate in [5.0, 12.0, 18.0] {
            let request = CalculationRequest::Gst(GstInput::new(1000.0, rate, GstMode::Exclusive));
            record_calculation(&conn, &record_for(request)).unwrap();
        }
        let gold = CalculationRequest::Gold(GoldInput::new(10.0, 6000.0, 22.0));
        record_calculation(&conn, &record_for(gold)).unwrap();

        let recent = recent_calculations(&conn, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].calculator, "gold");

        let gst = calculations_for(&conn, "gst").unwrap();
        assert_eq!(gst.len(), 3);
        assert!(gst.iter().all(|r| r.request["calculator"] == "gst"));
        assert_eq!(gst[0].result["total_amount"], 1180.0);
    }

    #[test]
    fn test_round_trip_fields() {
        let conn = memory_journal();
        let record = record_for(CalculationRequest::Gold(GoldInput::new(10.0, 6000.0, 22.0)));
        record_calculation(&conn, &record).unwrap();

        let stored = recent_calculations(&conn, 10).unwrap().remove(0);
        assert_eq!(stored.id, record.id);
        assert_eq!(stored.fingerprint, record.fingerprint);
        assert_eq!(stored.result, record.result);
        assert_eq!(stored.recorded_at.timestamp(), record.recorded_at.timestamp());
    }

    #[test]
    fn test_clear_history() {
        let conn = memory_journal();
        record_calculation(
            &conn,
            &record_for(CalculationRequest::Gold(GoldInput::new(1.0, 6000.0, 24.0))),
        )
        .unwrap();

        assert_eq!(clear_history(&conn).unwrap(), 1);
        assert_eq!(count_calculations(&conn).unwrap(), 0);
    }

    #[test]
    fn test_open_journal_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.db");

        let conn = open_journal(&path).unwrap();
        assert!(path.exists());
        assert_eq!(count_calculations(&conn).unwrap(), 0);
    }
}
