//! `SQLite`-backed ledger storage.

// SQLite returns i64 for row IDs and counts, but they're always
// non-negative here.
#![allow(clippy::cast_sign_loss)]

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use estudiantina_core::{EventConfig, NewSanction, NewScore, SanctionEntry, ScoreEntry};
use rusqlite::{Connection, OpenFlags, params};
use tokio::sync::Mutex;
use tracing::debug;

use super::LedgerError;

/// Schema SQL embedded at compile time. Both ledger tables share one
/// schema so the two ledgers may live in the same file or in separate
/// ones; each ledger only ever touches its own table.
const SCHEMA_SQL: &str = include_str!("schema.sql");

fn open_connection(path: &Path) -> Result<Connection, LedgerError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(conn)
}

fn in_memory_connection() -> Result<Connection, LedgerError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(conn)
}

fn now_ns(now: DateTime<Utc>) -> i64 {
    now.timestamp_nanos_opt().unwrap_or_default()
}

// =============================================================================
// ScoreLedger
// =============================================================================

/// The append-only competition score ledger.
pub struct ScoreLedger {
    conn: Mutex<Connection>,
    config: Arc<EventConfig>,
}

impl ScoreLedger {
    /// Opens or creates a score ledger at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>, config: Arc<EventConfig>) -> Result<Self, LedgerError> {
        Ok(Self {
            conn: Mutex::new(open_connection(path.as_ref())?),
            config,
        })
    }

    /// Creates an in-memory score ledger, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory(config: Arc<EventConfig>) -> Result<Self, LedgerError> {
        Ok(Self {
            conn: Mutex::new(in_memory_connection()?),
            config,
        })
    }

    /// Appends a score submission and returns the stored entry.
    ///
    /// The ledger assigns a strictly increasing id and the submission
    /// timestamp. Validation runs before the write; a rejected
    /// submission stores nothing.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if the submission is malformed
    /// - [`LedgerError::Database`] if the write fails
    pub async fn append(&self, submission: NewScore) -> Result<ScoreEntry, LedgerError> {
        submission.validate(&self.config)?;
        let submitted_at = Utc::now();

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO scores (cohort, competition, value, timestamp_ns)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                submission.cohort,
                submission.competition,
                submission.value,
                now_ns(submitted_at),
            ],
        )?;
        let id = conn.last_insert_rowid() as u64;
        debug!(id, cohort = %submission.cohort, value = submission.value, "score appended");

        Ok(ScoreEntry {
            id,
            cohort: submission.cohort,
            competition: submission.competition,
            value: submission.value,
            submitted_at,
        })
    }

    /// All score entries, ordered by value descending with ties broken
    /// by cohort ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_all(&self) -> Result<Vec<ScoreEntry>, LedgerError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT seq_id, cohort, competition, value, timestamp_ns
             FROM scores
             ORDER BY value DESC, cohort ASC, seq_id ASC",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(ScoreEntry {
                    id: row.get::<_, i64>(0)? as u64,
                    cohort: row.get(1)?,
                    competition: row.get(2)?,
                    value: row.get(3)?,
                    submitted_at: DateTime::from_timestamp_nanos(row.get(4)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Number of entries in the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count(&self) -> Result<u64, LedgerError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

// =============================================================================
// SanctionLedger
// =============================================================================

/// The append-only disciplinary sanction ledger.
pub struct SanctionLedger {
    conn: Mutex<Connection>,
    config: Arc<EventConfig>,
}

impl SanctionLedger {
    /// Opens or creates a sanction ledger at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>, config: Arc<EventConfig>) -> Result<Self, LedgerError> {
        Ok(Self {
            conn: Mutex::new(open_connection(path.as_ref())?),
            config,
        })
    }

    /// Creates an in-memory sanction ledger, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory(config: Arc<EventConfig>) -> Result<Self, LedgerError> {
        Ok(Self {
            conn: Mutex::new(in_memory_connection()?),
            config,
        })
    }

    /// Appends a sanction submission and returns the stored entry.
    ///
    /// The point deduction is resolved from the infraction catalog here,
    /// at submission time, and is never recomputed afterwards: later
    /// catalog changes do not touch stored entries.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Validation`] if the submission is malformed
    /// - [`LedgerError::Database`] if the write fails
    pub async fn append(&self, submission: NewSanction) -> Result<SanctionEntry, LedgerError> {
        submission.validate(&self.config)?;
        // validate() guarantees the code resolves.
        let points_deducted = self
            .config
            .infraction(submission.reason_code)
            .map(|infraction| infraction.points)
            .unwrap_or_default();
        let submitted_at = Utc::now();

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO sanctions
                 (cohort, reason_code, points_deducted, timestamp_ns, registered_by_name)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                submission.cohort,
                submission.reason_code,
                points_deducted,
                now_ns(submitted_at),
                submission.registered_by_name,
            ],
        )?;
        let id = conn.last_insert_rowid() as u64;
        debug!(
            id,
            cohort = %submission.cohort,
            reason_code = submission.reason_code,
            points_deducted,
            "sanction appended"
        );

        Ok(SanctionEntry {
            id,
            cohort: submission.cohort,
            reason_code: submission.reason_code,
            points_deducted,
            submitted_at,
            registered_by_name: submission.registered_by_name,
        })
    }

    /// All sanction entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_all(&self) -> Result<Vec<SanctionEntry>, LedgerError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT seq_id, cohort, reason_code, points_deducted, timestamp_ns,
                    registered_by_name
             FROM sanctions
             ORDER BY timestamp_ns DESC, seq_id DESC",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(SanctionEntry {
                    id: row.get::<_, i64>(0)? as u64,
                    cohort: row.get(1)?,
                    reason_code: row.get(2)?,
                    points_deducted: row.get(3)?,
                    submitted_at: DateTime::from_timestamp_nanos(row.get(4)?),
                    registered_by_name: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Number of entries in the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count(&self) -> Result<u64, LedgerError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sanctions", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
