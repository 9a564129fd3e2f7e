//! Disciplinary sanction entries.
//!
//! A sanction references an infraction catalog entry by reason code; the
//! point deduction is copied from the catalog at submission time and is
//! never recomputed, even if the catalog later changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::error::ValidationError;

/// A sanction submission before the ledger has accepted it.
///
/// The ledger assigns the id and timestamp, and resolves the point
/// deduction from the infraction catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSanction {
    /// Cohort the deduction applies to.
    pub cohort: String,

    /// Reason code referencing an infraction catalog entry.
    pub reason_code: u32,

    /// Display name of the staff member registering the sanction.
    pub registered_by_name: String,
}

impl NewSanction {
    /// Validates the submission against the roster and the infraction
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the cohort is not on the roster,
    /// the reason code is not in the catalog, or the registrar name is
    /// empty.
    pub fn validate(&self, config: &EventConfig) -> Result<(), ValidationError> {
        if !config.has_cohort(&self.cohort) {
            return Err(ValidationError::UnknownCohort {
                cohort: self.cohort.clone(),
            });
        }
        if config.infraction(self.reason_code).is_none() {
            return Err(ValidationError::UnknownInfraction {
                code: self.reason_code,
            });
        }
        if self.registered_by_name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "registered_by_name",
            });
        }
        Ok(())
    }
}

/// A sanction entry as stored in the append-only ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanctionEntry {
    /// Ledger-assigned id, strictly increasing across the process
    /// lifetime.
    pub id: u64,

    /// Cohort the deduction applies to.
    pub cohort: String,

    /// Reason code of the infraction.
    pub reason_code: u32,

    /// Points deducted, fixed at submission time. May be fractional.
    pub points_deducted: f64,

    /// When the ledger accepted the entry.
    pub submitted_at: DateTime<Utc>,

    /// Who registered the sanction.
    pub registered_by_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_code_and_cohort_are_accepted() {
        let config = EventConfig::default();
        NewSanction {
            cohort: "3° B".into(),
            reason_code: 12,
            registered_by_name: "Carlos Rodriguez".into(),
        }
        .validate(&config)
        .expect("valid submission");
    }

    #[test]
    fn unknown_reason_code_is_rejected() {
        let config = EventConfig::default();
        let err = NewSanction {
            cohort: "3° B".into(),
            reason_code: 999,
            registered_by_name: "Carlos Rodriguez".into(),
        }
        .validate(&config)
        .unwrap_err();
        assert_eq!(err, ValidationError::UnknownInfraction { code: 999 });
    }

    #[test]
    fn blank_registrar_name_is_rejected() {
        let config = EventConfig::default();
        let err = NewSanction {
            cohort: "3° B".into(),
            reason_code: 1,
            registered_by_name: "   ".into(),
        }
        .validate(&config)
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyField {
                field: "registered_by_name",
            },
        );
    }
}
