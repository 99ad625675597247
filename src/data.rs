use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the faculty roster. The adjustment weight is carried through
/// from the uploaded table but not consulted by the optimizer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMember {
    pub name: String,
    #[serde(default)]
    pub adjustment: f64,
    #[serde(default)]
    pub voting: bool,
}

/// Maps a course to the faculty member who teaches it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListing {
    pub course: String,
    pub faculty: String,
}

/// Per-course preference ranks over the slot catalog.
///
/// 0 means the slot was left unranked; positive values give preference
/// order with 1 = most preferred (the submission form offers ranks 1-4).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRow {
    pub course: String,
    pub ranks: Vec<u32>,
}

/// Per-request tuning knobs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizeConfig {
    /// Seed for the satisfaction tie-break noise; entropy when absent.
    pub seed: Option<u64>,
    /// Wall-clock budget handed to each solve.
    pub time_limit_secs: Option<f64>,
}

/// The complete input for one optimization run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub faculty: Vec<FacultyMember>,
    pub courses: Vec<CourseListing>,
    pub preferences: Vec<PreferenceRow>,
    #[serde(default)]
    pub config: OptimizeConfig,
}

/// A single realized course assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub course: String,
    pub slot: String,
    pub time: String,
    pub satisfaction: f64,
}

/// Descriptive statistics over a realized schedule.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStats {
    pub mwf_count: u32,
    pub tt_count: u32,
    pub time_counts: BTreeMap<String, u32>,
    pub slot_counts: Vec<u32>,
    pub balance_diff: u32,
    pub time_diff: u32,
}

/// The final output of an optimization run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub entries: Vec<ScheduleEntry>,
    pub satisfaction_total: f64,
    /// Minimized Kemeny disagreement; `None` when no consensus order was
    /// certified and the approximate popularity fallback was used.
    pub consensus_score: Option<f64>,
    pub slot_popularity: BTreeMap<String, f64>,
    pub solve_time_ms: u128,
    pub stats: ScheduleStats,
}
