//! The identity directory.
//!
//! A persisted mapping from identity number to profile. The directory
//! issues new identities, authenticates sign-ins, and lists all
//! registered profiles. The identity number alone is the credential: it
//! is a bearer lookup key, not a secret, and no password or token is
//! checked.
//!
//! Persistence goes through the [`DirectoryBackend`] trait so the durable
//! store can be swapped; [`SqliteDirectoryBackend`] is the production
//! backend and [`MemoryDirectoryBackend`] backs tests. All mutations are
//! write-through: the durable store is updated before the call returns,
//! and a failed write leaves the store unchanged. A single async mutex
//! serializes access, so readers observe either the pre- or the
//! post-mutation state, never a torn one.

mod memory;
mod storage;


pub use memory::MemoryDirectoryBackend;
pub use storage::SqliteDirectoryBackend;

use std::path::Path;
use std::sync::Arc;

use estudiantina_core::{EventConfig, Identity, NewIdentity, Role, ValidationError};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Errors from identity directory operations.
///
/// All variants are expected, caller-visible outcomes except
/// [`Database`](DirectoryError::Database), and the same invalid input
/// always reproduces the same failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DirectoryError {
    /// The registration request was malformed.
    #[error("invalid registration: {0}")]
    Validation(#[from] ValidationError),

    /// Registration with an identity number that is already taken.
    #[error("identity {id} is already registered")]
    DuplicateIdentity {
        /// The identity number that was already present.
        id: String,
    },

    /// Authentication of an identity number absent from the directory.
    #[error("unknown identity: {id}")]
    UnknownIdentity {
        /// The identity number that was not found.
        id: String,
    },

    /// Authentication of an identity whose role bars sign-in.
    #[error("identity {id} is not allowed to sign in")]
    Forbidden {
        /// The blocked identity number.
        id: String,
    },

    /// Error from the durable store.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// The stored value of a directory record: everything but the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProfile {
    /// Name shown in listings.
    pub display_name: String,

    /// The identity's role.
    pub role: Role,

    /// Roster cohort, for roles that compete as part of one.
    pub cohort: Option<String>,
}

impl StoredProfile {
    fn into_identity(self, id: &str) -> Identity {
        Identity {
            id: id.to_string(),
            display_name: self.display_name,
            role: self.role,
            cohort: self.cohort,
        }
    }
}

/// Durable key-value storage for identity records, keyed by identity
/// number.
///
/// Implementations must make each mutation atomic: a failed call leaves
/// the store exactly as it was. Serialization of concurrent access is
/// the caller's concern ([`IdentityDirectory`] holds the mutex).
pub trait DirectoryBackend: Send {
    /// Fetches the record for `id`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, id: &str) -> Result<Option<StoredProfile>, DirectoryError>;

    /// Inserts a record unless the key is already taken.
    ///
    /// Returns `true` when the record was inserted, `false` when the key
    /// already existed (the store is left unchanged).
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; no partial write may remain.
    fn insert(&mut self, id: &str, profile: &StoredProfile) -> Result<bool, DirectoryError>;

    /// Deletes the record for `id`. Returns whether a record existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, id: &str) -> Result<bool, DirectoryError>;

    /// All records in the store, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list(&self) -> Result<Vec<Identity>, DirectoryError>;

    /// Number of records in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn count(&self) -> Result<u64, DirectoryError>;
}

/// Bootstrap identities written to an empty store on first use.
///
/// Covers every role so each sign-in path is exercisable out of the box.
const BOOTSTRAP_IDENTITIES: [(&str, &str, Role, Option<&str>); 8] = [
    ("1111", "Juan Pérez", Role::Student, Some("5° A")),
    ("2222", "Maria Gonzalez", Role::Delegate, Some("4° B")),
    ("3333", "Carlos Rodriguez", Role::Juror, None),
    ("4444", "Ana Martinez", Role::Teacher, None),
    ("5555", "Luis Fernandez", Role::Supervisor, None),
    ("7777", "Visitante Genérico", Role::Visitor, None),
    ("8888", "Usuario Bloqueado", Role::Blocked, None),
    ("49993070", "Director/a Ejemplo", Role::Director, None),
];

/// The identity directory service.
///
/// Async facade over a [`DirectoryBackend`]. One mutex guards the
/// backend, so at most one mutation is in flight at a time and every
/// read sees a consistent snapshot.
pub struct IdentityDirectory {
    backend: Mutex<Box<dyn DirectoryBackend>>,
    config: Arc<EventConfig>,
}

impl IdentityDirectory {
    /// Wraps a backend, seeding the bootstrap identities if the store is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or seeded.
    pub async fn new(
        backend: impl DirectoryBackend + 'static,
        config: Arc<EventConfig>,
    ) -> Result<Self, DirectoryError> {
        let directory = Self {
            backend: Mutex::new(Box::new(backend)),
            config,
        };
        directory.seed_if_empty().await?;
        Ok(directory)
    }

    /// Opens a SQLite-backed directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, initialized,
    /// or seeded.
    pub async fn open(
        path: impl AsRef<Path>,
        config: Arc<EventConfig>,
    ) -> Result<Self, DirectoryError> {
        let backend = SqliteDirectoryBackend::open(path)?;
        Self::new(backend, config).await
    }

    /// Opens an in-memory SQLite-backed directory, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized or seeded.
    pub async fn in_memory(config: Arc<EventConfig>) -> Result<Self, DirectoryError> {
        let backend = SqliteDirectoryBackend::in_memory()?;
        Self::new(backend, config).await
    }

    async fn seed_if_empty(&self) -> Result<(), DirectoryError> {
        let mut backend = self.backend.lock().await;
        if backend.count()? > 0 {
            return Ok(());
        }
        for (id, display_name, role, cohort) in BOOTSTRAP_IDENTITIES {
            let profile = StoredProfile {
                display_name: display_name.to_string(),
                role,
                cohort: cohort.map(str::to_string),
            };
            backend.insert(id, &profile)?;
        }
        info!(
            count = BOOTSTRAP_IDENTITIES.len(),
            "seeded empty identity directory"
        );
        Ok(())
    }

    /// Authenticates an identity number.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::UnknownIdentity`] if the id is absent
    /// - [`DirectoryError::Forbidden`] if the resolved role is
    ///   [`Role::Blocked`]
    /// - [`DirectoryError::Database`] if the store cannot be read
    pub async fn authenticate(&self, id: &str) -> Result<Identity, DirectoryError> {
        let backend = self.backend.lock().await;
        let profile = backend
            .get(id)?
            .ok_or_else(|| DirectoryError::UnknownIdentity { id: id.to_string() })?;
        if profile.role == Role::Blocked {
            debug!(id, "blocked identity attempted sign-in");
            return Err(DirectoryError::Forbidden { id: id.to_string() });
        }
        Ok(profile.into_identity(id))
    }

    /// Registers a new identity and returns the stored profile.
    ///
    /// Validation runs before any write, so a rejected request leaves
    /// the store untouched.
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::Validation`] for malformed requests
    /// - [`DirectoryError::DuplicateIdentity`] if the id is taken
    /// - [`DirectoryError::Database`] if the write fails
    pub async fn register(&self, request: NewIdentity) -> Result<Identity, DirectoryError> {
        request.validate(&self.config)?;
        let profile = StoredProfile {
            display_name: request.display_name.clone(),
            role: request.role,
            cohort: request.cohort.clone(),
        };
        let mut backend = self.backend.lock().await;
        if !backend.insert(&request.id, &profile)? {
            return Err(DirectoryError::DuplicateIdentity { id: request.id });
        }
        debug!(id = %request.id, role = %request.role, "registered identity");
        Ok(request.into_identity())
    }

    /// Deletes an identity by key.
    ///
    /// A pure delete: removing an id that is absent is a no-op. Policy
    /// such as refusing self-deletion belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn remove(&self, id: &str) -> Result<(), DirectoryError> {
        let mut backend = self.backend.lock().await;
        if backend.remove(id)? {
            debug!(id, "removed identity");
        } else {
            debug!(id, "remove of absent identity ignored");
        }
        Ok(())
    }

    /// Lists all identities, sorted by display name ascending (ordinal,
    /// case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<Identity>, DirectoryError> {
        let backend = self.backend.lock().await;
        let mut identities = backend.list()?;
        identities.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(identities)
    }
}
