use serde::{Deserialize, Serialize};

/// Maximum configurable streak grace days (see [`Settings::streak_grace_days`]).
pub const MAX_STREAK_GRACE_DAYS: u8 = 5;

/// Per-scope singleton of user-tunable thresholds and goals. One row for the
/// guest scope, one per authenticated identity. `dark_mode` is persisted for
/// the presentation layer but ignored by core logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub weekly_goal: u32,
    pub daily_goal: u32,
    pub follow_up_days: u32,
    pub interview_follow_up_days: u32,
    pub ghosted_days: u32,
    pub streak_grace_days: u8,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weekly_goal: 8,
            daily_goal: 2,
            follow_up_days: 7,
            interview_follow_up_days: 2,
            ghosted_days: 21,
            streak_grace_days: 2,
            dark_mode: false,
        }
    }
}

/// Partial update for settings. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub weekly_goal: Option<u32>,
    pub daily_goal: Option<u32>,
    pub follow_up_days: Option<u32>,
    pub interview_follow_up_days: Option<u32>,
    pub ghosted_days: Option<u32>,
    pub streak_grace_days: Option<u8>,
    pub dark_mode: Option<bool>,
}

impl SettingsPatch {
    /// Apply to a settings row in place. `streak_grace_days` is clamped to
    /// the supported 0..=5 range.
    pub fn apply_to(self, settings: &mut Settings) {
        if let Some(value) = self.weekly_goal {
            settings.weekly_goal = value;
        }
        if let Some(value) = self.daily_goal {
            settings.daily_goal = value;
        }
        if let Some(value) = self.follow_up_days {
            settings.follow_up_days = value;
        }
        if let Some(value) = self.interview_follow_up_days {
            settings.interview_follow_up_days = value;
        }
        if let Some(value) = self.ghosted_days {
            settings.ghosted_days = value;
        }
        if let Some(value) = self.streak_grace_days {
            settings.streak_grace_days = value.min(MAX_STREAK_GRACE_DAYS);
        }
        if let Some(value) = self.dark_mode {
            settings.dark_mode = value;
        }
    }
}
