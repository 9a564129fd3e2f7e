//! Validation failures shared across the domain model.

use thiserror::Error;

use crate::identity::Role;

/// Rejection of malformed or out-of-range input.
///
/// Every variant is an expected, caller-visible outcome: the input is
/// reported back for resubmission and no store is modified. The same
/// invalid input always produces the same variant.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A required text field was empty.
    #[error("required field '{field}' is empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The identity number contained something other than decimal digits.
    #[error("identity number '{id}' must contain only digits")]
    MalformedId {
        /// The rejected identity number.
        id: String,
    },

    /// A role that competes as part of a cohort was registered without one.
    #[error("role {role} requires a cohort")]
    MissingCohort {
        /// The cohort-requiring role.
        role: Role,
    },

    /// A cohort was supplied for a role that does not belong to one.
    #[error("role {role} does not take a cohort")]
    UnexpectedCohort {
        /// The role that was given a cohort.
        role: Role,
    },

    /// The named cohort is not part of the event roster.
    #[error("unknown cohort: {cohort}")]
    UnknownCohort {
        /// The rejected cohort name.
        cohort: String,
    },

    /// The named competition is not in the competition catalog.
    #[error("unknown competition: {competition}")]
    UnknownCompetition {
        /// The rejected competition name.
        competition: String,
    },

    /// A score value outside the accepted range.
    #[error("score {value} is outside the accepted range {min}..={max}")]
    ScoreOutOfRange {
        /// The rejected value.
        value: u32,
        /// Lower bound of the accepted range.
        min: u32,
        /// Upper bound of the accepted range.
        max: u32,
    },

    /// A sanction referenced an infraction code missing from the catalog.
    #[error("unknown infraction code: {code}")]
    UnknownInfraction {
        /// The rejected code.
        code: u32,
    },
}
