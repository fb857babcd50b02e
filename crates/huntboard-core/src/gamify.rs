//! Gamification engine: XP, levels, streaks, and badges.
//!
//! Pure state transitions over [`UserProgress`]. The store layer calls these
//! from its write paths; nothing here performs I/O or reads the clock — the
//! current date is always a parameter so behavior is reproducible in tests.

use chrono::{Datelike, NaiveDate};

use crate::model::progress::{UserProgress, WeeklyStat, badges};

/// Cumulative XP required to reach each level. Index `i` is the floor of
/// level `i + 1`; the highest index whose threshold does not exceed the
/// current XP wins.
pub const XP_LADDER: [u32; 10] = [0, 100, 250, 500, 1000, 2000, 3500, 5500, 8000, 11000];

/// The actions that earn XP, with their fixed award amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpAward {
    /// A note or contact added to an application.
    Detail,
    /// The one-time transition of an application out of `saved`.
    FirstApply,
    /// A follow-up logged against an application.
    FollowUp,
    /// An application reaching `offer`.
    Offer,
}

impl XpAward {
    /// XP amount for this action. Always strictly positive, so XP (and
    /// therefore level) is monotonically non-decreasing.
    #[must_use]
    pub const fn amount(self) -> u32 {
        match self {
            Self::Detail => 5,
            Self::FirstApply => 10,
            Self::FollowUp => 15,
            Self::Offer => 100,
        }
    }
}

/// Level for a given XP total: highest ladder index not exceeding `xp`,
/// plus one. XP past the top threshold stays at the top level.
#[must_use]
pub fn level_for_xp(xp: u32) -> u32 {
    let index = XP_LADDER
        .iter()
        .rposition(|&threshold| threshold <= xp)
        .unwrap_or(0);
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Add XP for an action and recompute the level.
pub fn award_xp(progress: &mut UserProgress, award: XpAward) {
    progress.xp = progress.xp.saturating_add(award.amount());
    progress.level = level_for_xp(progress.xp);
}

/// Outcome of a streak evaluation, for logging and badge checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    /// Already counted today; nothing changed.
    AlreadyCounted,
    /// Consecutive day: streak extended by one.
    Extended,
    /// Gap covered by the single grace allowance; streak preserved.
    GraceUsed,
    /// Gap too large (or grace already spent); streak restarted at one.
    Reset,
    /// First recorded activity ever.
    Started,
}

/// Advance the streak state for activity on `today`.
///
/// `grace_days` comes from the user's settings (0..=5). A gap of
/// `1 < d <= 1 + grace_days` whole days is forgiven exactly once; the
/// allowance replenishes only when a true consecutive day is logged.
pub fn update_streak(progress: &mut UserProgress, today: NaiveDate, grace_days: u8) -> StreakOutcome {
    let Some(last) = progress.last_active_date else {
        progress.current_streak = 1;
        progress.longest_streak = progress.longest_streak.max(1);
        progress.last_active_date = Some(today);
        progress.streak_grace_used = false;
        return StreakOutcome::Started;
    };

    let gap = (today - last).num_days();
    if gap <= 0 {
        return StreakOutcome::AlreadyCounted;
    }

    if gap == 1 {
        progress.current_streak = progress.current_streak.saturating_add(1);
        progress.longest_streak = progress.longest_streak.max(progress.current_streak);
        progress.last_active_date = Some(today);
        progress.streak_grace_used = false;
        return StreakOutcome::Extended;
    }

    if gap <= 1 + i64::from(grace_days) && !progress.streak_grace_used {
        progress.last_active_date = Some(today);
        progress.streak_grace_used = true;
        return StreakOutcome::GraceUsed;
    }

    progress.current_streak = 1;
    progress.longest_streak = progress.longest_streak.max(1);
    progress.last_active_date = Some(today);
    progress.streak_grace_used = false;
    StreakOutcome::Reset
}

/// Award a badge unless it is already held. Returns true when newly earned.
pub fn award_badge_if_new(progress: &mut UserProgress, badge: &str) -> bool {
    if progress.badges.contains(badge) {
        return false;
    }
    progress.badges.insert(badge.to_string());
    true
}

/// Check counter-driven badges after a write. Returns the badges newly
/// earned by this check (possibly empty).
pub fn check_badges(progress: &mut UserProgress) -> Vec<&'static str> {
    let mut earned = Vec::new();
    let candidates: [(&'static str, bool); 5] = [
        (badges::FIRST_APPLICATION, progress.total_applications >= 1),
        (badges::TEN_APPLICATIONS, progress.total_applications >= 10),
        (badges::FIRST_INTERVIEW, progress.total_interviews >= 1),
        (badges::FIRST_OFFER, progress.total_offers >= 1),
        (badges::WEEK_STREAK, progress.current_streak >= 7),
    ];
    for (badge, qualified) in candidates {
        if qualified && award_badge_if_new(progress, badge) {
            earned.push(badge);
        }
    }
    earned
}

/// Bump the rollup row for the week containing `date`, creating it if this
/// is the first activity that week. Weeks start on Monday.
pub fn record_weekly_activity(
    progress: &mut UserProgress,
    date: NaiveDate,
    applications: u32,
    interviews: u32,
) {
    let week_start = date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()));
    if let Some(stat) = progress
        .weekly_stats
        .iter_mut()
        .find(|stat| stat.week_start == week_start)
    {
        stat.applications = stat.applications.saturating_add(applications);
        stat.interviews = stat.interviews.saturating_add(interviews);
    } else {
        progress.weekly_stats.push(WeeklyStat {
            week_start,
            applications,
            interviews,
        });
    }
}
