//! Standings aggregation.
//!
//! The ledgers are the source of truth; every view here is a read model
//! recomputed from scratch on each call. The aggregator holds no state of
//! its own and is a deterministic function of (configuration, score
//! snapshot, sanction snapshot): equal inputs always produce identical
//! output, including row order.
//!
//! Entries that reference cohorts outside the roster cannot be produced
//! through the ledgers; if such entries are handed in anyway they are
//! ignored, since only roster cohorts produce rows.


use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::sanction::SanctionEntry;
use crate::score::ScoreEntry;

/// Number of rows on the podium.
pub const PODIUM_SIZE: usize = 3;

/// One cohort's line in the global standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    /// The cohort this row aggregates.
    pub cohort: String,

    /// Sum of all raw scores awarded to the cohort.
    pub total_score: i64,

    /// Sum of all points deducted from the cohort.
    pub total_sanctions: f64,

    /// `total_score - total_sanctions`. May be negative; never clamped.
    pub net_total: f64,
}

/// The full score matrix: one row per cohort, one column per competition,
/// columns grouped by day in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreMatrix {
    /// Column groups, in catalog order.
    pub days: Vec<MatrixDay>,

    /// One row per roster cohort, in roster order.
    pub rows: Vec<MatrixRow>,
}

/// A column group of the score matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixDay {
    /// The day's label.
    pub label: String,

    /// Competition column headers under this day.
    pub competitions: Vec<String>,
}

/// One cohort's row of the score matrix.
///
/// `cells` is aligned with the flattened competition order of the
/// catalog. An empty cell is `None`, never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    /// The cohort this row belongs to.
    pub cohort: String,

    /// Latest known score per competition, catalog order.
    pub cells: Vec<Option<u32>>,
}

/// A single cohort's standings sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSheet {
    /// The cohort the sheet covers.
    pub cohort: String,

    /// `(competition, latest value)` pairs in catalog order; `None` where
    /// the cohort has no submission.
    pub competition_values: Vec<(String, Option<u32>)>,

    /// Sum of all raw scores for the cohort.
    pub total_score: i64,

    /// Sum of all deductions for the cohort.
    pub total_sanctions: f64,

    /// `total_score - total_sanctions`.
    pub net_total: f64,
}

/// Computes the global standings: one row per roster cohort, sorted by
/// net total descending with ties broken by cohort name ascending.
///
/// Cohorts with no activity appear with totals of zero.
#[must_use]
pub fn global_standings(
    config: &EventConfig,
    scores: &[ScoreEntry],
    sanctions: &[SanctionEntry],
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = config
        .cohorts
        .iter()
        .map(|cohort| standings_row(cohort, scores, sanctions))
        .collect();
    rows.sort_by(|a, b| {
        b.net_total
            .total_cmp(&a.net_total)
            .then_with(|| a.cohort.cmp(&b.cohort))
    });
    rows
}

/// The top rows of the global standings, at most [`PODIUM_SIZE`] of them,
/// in rank order. No padding when fewer cohorts exist.
#[must_use]
pub fn podium(
    config: &EventConfig,
    scores: &[ScoreEntry],
    sanctions: &[SanctionEntry],
) -> Vec<StandingsRow> {
    let mut rows = global_standings(config, scores, sanctions);
    rows.truncate(PODIUM_SIZE);
    rows
}

/// Builds the full score matrix.
///
/// Each cell holds the latest known value for its (cohort, competition)
/// pair: when the pair has several ledger entries, the one with the
/// highest id supersedes the others for display, while all of them remain
/// in the ledger and keep counting toward totals.
#[must_use]
pub fn score_matrix(config: &EventConfig, scores: &[ScoreEntry]) -> ScoreMatrix {
    let latest = latest_by_pair(scores);
    let competitions: Vec<&str> = config.competitions().collect();
    let rows = config
        .cohorts
        .iter()
        .map(|cohort| MatrixRow {
            cohort: cohort.clone(),
            cells: competitions
                .iter()
                .map(|competition| {
                    latest
                        .get(&(cohort.as_str(), *competition))
                        .map(|(_, value)| *value)
                })
                .collect(),
        })
        .collect();
    ScoreMatrix {
        days: config
            .competition_days
            .iter()
            .map(|day| MatrixDay {
                label: day.label.clone(),
                competitions: day.competitions.clone(),
            })
            .collect(),
        rows,
    }
}

/// Builds the standings sheet for a single cohort, or `None` when the
/// cohort is not on the roster.
///
/// The totals are computed by the same arithmetic as the cohort's row in
/// [`global_standings`].
#[must_use]
pub fn cohort_sheet(
    config: &EventConfig,
    scores: &[ScoreEntry],
    sanctions: &[SanctionEntry],
    cohort: &str,
) -> Option<CohortSheet> {
    if !config.has_cohort(cohort) {
        return None;
    }
    let row = standings_row(cohort, scores, sanctions);
    let latest = latest_by_pair(scores);
    let competition_values = config
        .competitions()
        .map(|competition| {
            let value = latest.get(&(cohort, competition)).map(|(_, value)| *value);
            (competition.to_string(), value)
        })
        .collect();
    Some(CohortSheet {
        cohort: cohort.to_string(),
        competition_values,
        total_score: row.total_score,
        total_sanctions: row.total_sanctions,
        net_total: row.net_total,
    })
}

/// Folds both ledgers into a single cohort's totals.
fn standings_row(
    cohort: &str,
    scores: &[ScoreEntry],
    sanctions: &[SanctionEntry],
) -> StandingsRow {
    let total_score: i64 = scores
        .iter()
        .filter(|entry| entry.cohort == cohort)
        .map(|entry| i64::from(entry.value))
        .sum();
    let total_sanctions: f64 = sanctions
        .iter()
        .filter(|entry| entry.cohort == cohort)
        .map(|entry| entry.points_deducted)
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let net_total = total_score as f64 - total_sanctions;
    StandingsRow {
        cohort: cohort.to_string(),
        total_score,
        total_sanctions,
        net_total,
    }
}

/// Latest `(id, value)` per (cohort, competition) pair. Later submissions
/// carry higher ledger ids, so the highest id wins.
fn latest_by_pair(scores: &[ScoreEntry]) -> HashMap<(&str, &str), (u64, u32)> {
    let mut latest: HashMap<(&str, &str), (u64, u32)> = HashMap::new();
    for entry in scores {
        let cell = (entry.id, entry.value);
        latest
            .entry((entry.cohort.as_str(), entry.competition.as_str()))
            .and_modify(|current| {
                if entry.id > current.0 {
                    *current = cell;
                }
            })
            .or_insert(cell);
    }
    latest
}
