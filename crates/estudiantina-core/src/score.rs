//! Competition score entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::error::ValidationError;

/// Smallest accepted raw score.
pub const MIN_SCORE: u32 = 0;

/// Largest accepted raw score.
pub const MAX_SCORE: u32 = 1000;

/// A score submission before the ledger has accepted it.
///
/// The ledger assigns the id and timestamp on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScore {
    /// Cohort the score is awarded to.
    pub cohort: String,

    /// Competition the score was earned in.
    pub competition: String,

    /// Raw score, `MIN_SCORE..=MAX_SCORE`.
    pub value: u32,
}

impl NewScore {
    /// Validates the submission against the roster, the competition
    /// catalog, and the accepted score range.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first violated invariant.
    pub fn validate(&self, config: &EventConfig) -> Result<(), ValidationError> {
        if !config.has_cohort(&self.cohort) {
            return Err(ValidationError::UnknownCohort {
                cohort: self.cohort.clone(),
            });
        }
        if !config.has_competition(&self.competition) {
            return Err(ValidationError::UnknownCompetition {
                competition: self.competition.clone(),
            });
        }
        if self.value > MAX_SCORE {
            return Err(ValidationError::ScoreOutOfRange {
                value: self.value,
                min: MIN_SCORE,
                max: MAX_SCORE,
            });
        }
        Ok(())
    }
}

/// A score entry as stored in the append-only ledger.
///
/// Entries are immutable: never edited, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Ledger-assigned id, strictly increasing across the process
    /// lifetime.
    pub id: u64,

    /// Cohort the score was awarded to.
    pub cohort: String,

    /// Competition the score was earned in.
    pub competition: String,

    /// Raw score.
    pub value: u32,

    /// When the ledger accepted the entry.
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_score_for_known_pair_is_accepted() {
        let config = EventConfig::default();
        NewScore {
            cohort: "5° A".into(),
            competition: "Fútbol".into(),
            value: 1000,
        }
        .validate(&config)
        .expect("valid submission");
    }

    #[test]
    fn score_above_range_is_rejected() {
        let config = EventConfig::default();
        let err = NewScore {
            cohort: "5° A".into(),
            competition: "Fútbol".into(),
            value: 1001,
        }
        .validate(&config)
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::ScoreOutOfRange {
                value: 1001,
                min: MIN_SCORE,
                max: MAX_SCORE,
            },
        );
    }

    #[test]
    fn unknown_cohort_and_competition_are_rejected() {
        let config = EventConfig::default();
        assert!(matches!(
            NewScore {
                cohort: "7° Q".into(),
                competition: "Fútbol".into(),
                value: 10,
            }
            .validate(&config)
            .unwrap_err(),
            ValidationError::UnknownCohort { .. },
        ));
        assert!(matches!(
            NewScore {
                cohort: "5° A".into(),
                competition: "Ajedrez".into(),
                value: 10,
            }
            .validate(&config)
            .unwrap_err(),
            ValidationError::UnknownCompetition { .. },
        ));
    }
}
