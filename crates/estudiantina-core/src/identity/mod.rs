//! Identity model and role capabilities.
//!
//! Every participant signs in with a national identity number; the number
//! is a bearer lookup key, not a secret. Each identity carries exactly one
//! [`Role`], and roles map to an explicit [`Permission`] set that callers
//! check before invoking a mutating operation. The core itself never
//! branches on roles beyond the blocked-sign-in check in the directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EventConfig;
use crate::error::ValidationError;

// =============================================================================
// Role
// =============================================================================

/// The closed set of participant roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A student competing as part of a cohort.
    Student,
    /// A cohort's elected representative.
    Delegate,
    /// A juror who submits competition scores and sanctions.
    Juror,
    /// Teaching staff; views standings only.
    Teacher,
    /// Supervising staff (preceptor); views standings only.
    Supervisor,
    /// Event administration; manages identities and the schedule.
    Director,
    /// An external visitor with read-only access.
    Visitor,
    /// An identity barred from signing in at all.
    Blocked,
}

/// All roles, in declaration order.
pub const ALL_ROLES: [Role; 8] = [
    Role::Student,
    Role::Delegate,
    Role::Juror,
    Role::Teacher,
    Role::Supervisor,
    Role::Director,
    Role::Visitor,
    Role::Blocked,
];

impl Role {
    /// Whether identities with this role must belong to a roster cohort.
    #[must_use]
    pub const fn requires_cohort(self) -> bool {
        matches!(self, Self::Student | Self::Delegate)
    }

    /// The permissions granted to this role.
    ///
    /// Recovered from the original panels: jurors submit scores and
    /// sanctions; the director additionally registers identities and
    /// manages the schedule; every other role is view-only.
    #[must_use]
    pub const fn permissions(self) -> &'static [Permission] {
        match self {
            Self::Juror => &[Permission::SubmitScore, Permission::SubmitSanction],
            Self::Director => &[
                Permission::RegisterIdentity,
                Permission::SubmitSanction,
                Permission::ManageSchedule,
            ],
            Self::Student
            | Self::Delegate
            | Self::Teacher
            | Self::Supervisor
            | Self::Visitor
            | Self::Blocked => &[],
        }
    }

    /// Whether this role holds the given permission.
    #[must_use]
    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Canonical string form, used for durable storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Delegate => "delegate",
            Self::Juror => "juror",
            Self::Teacher => "teacher",
            Self::Supervisor => "supervisor",
            Self::Director => "director",
            Self::Visitor => "visitor",
            Self::Blocked => "blocked",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`Role`] from its canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ROLES
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

// =============================================================================
// Permission
// =============================================================================

/// Capabilities checked by callers before invoking a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// May register new identities in the directory.
    RegisterIdentity,
    /// May append competition scores to the score ledger.
    SubmitScore,
    /// May append disciplinary sanctions to the sanction ledger.
    SubmitSanction,
    /// May edit the event schedule (handled outside this crate).
    ManageSchedule,
}

// =============================================================================
// Identity
// =============================================================================

/// A registered participant profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity number: unique, immutable, digits only.
    pub id: String,

    /// Name shown in listings and standings views.
    pub display_name: String,

    /// The participant's role.
    pub role: Role,

    /// Roster cohort; present exactly when the role requires one.
    pub cohort: Option<String>,
}

/// A registration request, before the directory has accepted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIdentity {
    /// Requested identity number.
    pub id: String,

    /// Display name for the new identity.
    pub display_name: String,

    /// Role to register under.
    pub role: Role,

    /// Cohort, required iff the role competes as part of one.
    pub cohort: Option<String>,
}

impl NewIdentity {
    /// Validates the request against the identity invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id or display name is empty,
    /// the id contains non-digits, the cohort is missing for a
    /// cohort-requiring role, present for a role that takes none, or
    /// names a cohort outside the event roster.
    pub fn validate(&self, config: &EventConfig) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyField { field: "id" });
        }
        if !self.id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::MalformedId {
                id: self.id.clone(),
            });
        }
        if self.display_name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "display_name",
            });
        }
        match (&self.cohort, self.role.requires_cohort()) {
            (None, true) => Err(ValidationError::MissingCohort { role: self.role }),
            (Some(_), false) => Err(ValidationError::UnexpectedCohort { role: self.role }),
            (Some(cohort), true) if !config.has_cohort(cohort) => {
                Err(ValidationError::UnknownCohort {
                    cohort: cohort.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// The accepted profile this request produces.
    #[must_use]
    pub fn into_identity(self) -> Identity {
        Identity {
            id: self.id,
            display_name: self.display_name,
            role: self.role,
            cohort: self.cohort,
        }
    }
}
