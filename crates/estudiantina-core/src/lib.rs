//! estudiantina-core - Contest domain model and standings aggregation
//!
//! This crate holds the pure half of the Estudiantina inter-class contest
//! system: identities and role capabilities, the static event
//! configuration (cohort roster, competition catalog, infraction
//! catalog), score and sanction entry types with their validation rules,
//! and the standings aggregator that folds ledger snapshots into ranked
//! views.
//!
//! Nothing in this crate performs I/O. Persistence and the async service
//! surface live in `estudiantina-store`, which consumes these types.
//!
//! # Modules
//!
//! - [`identity`]: `Identity`, the closed [`Role`](identity::Role) set,
//!   and the explicit role→permission table
//! - [`config`]: `EventConfig` with built-in defaults and TOML loading
//! - [`score`] / [`sanction`]: ledger entry types and validation
//! - [`standings`]: pure read models — global standings, podium, score
//!   matrix, per-cohort sheet

pub mod config;
pub mod error;
pub mod identity;
pub mod sanction;
pub mod score;
pub mod standings;

pub use config::{CompetitionDay, ConfigError, EventConfig, Infraction};
pub use error::ValidationError;
pub use identity::{ALL_ROLES, Identity, NewIdentity, ParseRoleError, Permission, Role};
pub use sanction::{NewSanction, SanctionEntry};
pub use score::{MAX_SCORE, MIN_SCORE, NewScore, ScoreEntry};
pub use standings::{
    CohortSheet, MatrixDay, MatrixRow, PODIUM_SIZE, ScoreMatrix, StandingsRow, cohort_sheet,
    global_standings, podium, score_matrix,
};
