//! estudiantina-store - Persisted stores for the contest core
//!
//! This crate holds the stateful half of the Estudiantina contest
//! system: the identity directory and the two append-only ledgers. All
//! operations are `async fn`s; each store serializes access through its
//! own mutex, so writes never overlap and reads always observe either
//! the pre- or the post-mutation state. The stores are independently
//! consistent; there are no transactions spanning more than one of them.
//!
//! There is no retry anywhere: operations either complete or fail with a
//! typed error, and a failed mutation leaves the store unchanged.
//!
//! # Modules
//!
//! - [`directory`]: the identity directory over a pluggable
//!   [`DirectoryBackend`](directory::DirectoryBackend)
//! - [`ledger`]: the score and sanction ledgers
//!
//! The standings views live in `estudiantina-core` and are computed from
//! ledger snapshots:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use estudiantina_core::{EventConfig, global_standings};
//! use estudiantina_store::ledger::{SanctionLedger, ScoreLedger};
//!
//! # async fn example() -> Result<(), estudiantina_store::ledger::LedgerError> {
//! let config = Arc::new(EventConfig::default());
//! let scores = ScoreLedger::open("scores.db", Arc::clone(&config))?;
//! let sanctions = SanctionLedger::open("sanctions.db", Arc::clone(&config))?;
//!
//! let standings = global_standings(
//!     &config,
//!     &scores.list_all().await?,
//!     &sanctions.list_all().await?,
//! );
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod ledger;

pub use directory::{DirectoryBackend, DirectoryError, IdentityDirectory};
pub use ledger::{LedgerError, SanctionLedger, ScoreLedger};
