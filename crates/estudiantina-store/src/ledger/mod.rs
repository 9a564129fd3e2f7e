//! Append-only score and sanction ledgers.
//!
//! Both ledgers are backed by `SQLite` with WAL mode. Entries can only be
//! appended, never edited or deleted; the ledger assigns a strictly
//! increasing id and a UTC timestamp on append and returns the stored
//! form. Validation runs before any write, so a rejected submission
//! leaves the ledger untouched.
//!
//! The ledgers keep physical insertion order and produce their
//! contractual orderings in the read query:
//!
//! - scores: value descending, ties by cohort ascending
//! - sanctions: most recent first
//!
//! Each ledger guards its connection with its own async mutex; the two
//! stores are independently consistent and writes to one never block
//! reads of the other.

mod storage;


pub use storage::{SanctionLedger, ScoreLedger};

use estudiantina_core::ValidationError;
use thiserror::Error;

/// Errors from ledger operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    /// The submission failed validation; nothing was stored.
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),

    /// Error from the durable store.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
