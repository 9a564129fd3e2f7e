//! `SQLite`-backed directory storage.
//!
//! Uses `SQLite` with WAL mode; the schema is embedded at compile time.
//! Each mutation is a single statement and therefore atomic: a failed
//! write leaves no partial record behind.

// SQLite returns i64 for counts, but they're always non-negative.
#![allow(clippy::cast_sign_loss)]

use std::path::Path;
use std::str::FromStr;

use estudiantina_core::{Identity, Role};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use super::{DirectoryBackend, DirectoryError, StoredProfile};

/// Schema SQL embedded at compile time.
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// The production directory backend.
pub struct SqliteDirectoryBackend {
    conn: Connection,
}

impl SqliteDirectoryBackend {
    /// Opens or creates a directory database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Creates an in-memory directory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self, DirectoryError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }
}

fn row_to_profile(
    display_name: String,
    role: String,
    cohort: Option<String>,
) -> Result<StoredProfile, rusqlite::Error> {
    let role = Role::from_str(&role).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })?;
    Ok(StoredProfile {
        display_name,
        role,
        cohort,
    })
}

impl DirectoryBackend for SqliteDirectoryBackend {
    fn get(&self, id: &str) -> Result<Option<StoredProfile>, DirectoryError> {
        let profile = self
            .conn
            .query_row(
                "SELECT display_name, role, cohort FROM identities WHERE id = ?1",
                params![id],
                |row| row_to_profile(row.get(0)?, row.get(1)?, row.get(2)?),
            )
            .optional()?;
        Ok(profile)
    }

    fn insert(&mut self, id: &str, profile: &StoredProfile) -> Result<bool, DirectoryError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO identities (id, display_name, role, cohort)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id,
                profile.display_name,
                profile.role.as_str(),
                profile.cohort,
            ],
        )?;
        Ok(inserted == 1)
    }

    fn remove(&mut self, id: &str) -> Result<bool, DirectoryError> {
        let removed = self
            .conn
            .execute("DELETE FROM identities WHERE id = ?1", params![id])?;
        Ok(removed == 1)
    }

    fn list(&self) -> Result<Vec<Identity>, DirectoryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, display_name, role, cohort FROM identities")?;
        let identities = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let profile = row_to_profile(row.get(1)?, row.get(2)?, row.get(3)?)?;
                Ok(profile.into_identity(&id))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(identities)
    }

    fn count(&self) -> Result<u64, DirectoryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM identities", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
