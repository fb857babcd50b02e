use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Known badge identifiers. Badges live in the progress row as plain
/// strings so new ones can ship without a schema change.
pub mod badges {
    pub const FIRST_APPLICATION: &str = "first-application";
    pub const TEN_APPLICATIONS: &str = "ten-applications";
    pub const FIRST_INTERVIEW: &str = "first-interview";
    pub const FIRST_OFFER: &str = "first-offer";
    pub const WEEK_STREAK: &str = "week-streak";
}

/// One historical week of activity, rolled up for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStat {
    pub week_start: NaiveDate,
    pub applications: u32,
    pub interviews: u32,
}

/// Per-scope singleton tracking XP, level, streaks, counters, and badges.
///
/// Invariants maintained by the gamification engine:
/// - `xp` only increases, so `level` never decreases.
/// - `longest_streak >= current_streak` at all times.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProgress {
    pub xp: u32,
    pub level: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_active_date: Option<NaiveDate>,
    pub streak_grace_used: bool,
    pub total_applications: u32,
    pub total_interviews: u32,
    pub total_offers: u32,
    pub total_follow_ups: u32,
    pub badges: BTreeSet<String>,
    pub milestones: Vec<String>,
    pub weekly_stats: Vec<WeeklyStat>,
}

impl UserProgress {
    /// Fresh progress row: zero XP is level 1, no streak yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: 1,
            ..Self::default()
        }
    }
}
