//! Shared write-path gamification.
//!
//! Both backends funnel XP-affecting writes through [`apply_activity`] so
//! a guest and a signed-in user earn identical progress for identical
//! actions. This is the only caller of the gamification engine.

use chrono::NaiveDate;
use huntboard_core::gamify::{
    self, StreakOutcome, XpAward, award_xp, check_badges, record_weekly_activity,
};
use huntboard_core::model::application::Status;
use huntboard_core::model::event::EventKind;
use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::settings::Settings;
use tracing::debug;

/// A progress-relevant write, as seen by either backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Created { initial_status: Status },
    StatusChanged { from: Status, to: Status },
    EventAdded { kind: EventKind },
    ContactAdded,
}

/// Fold one write into the progress row: counters, XP, streak, badges.
///
/// XP awards: the one-time departure from `saved` earns +10, a follow-up
/// +15, an offer arrival +100, notes and contacts +5. Creation itself earns
/// nothing (`saved` is the zero-XP entry state). Every action counts as
/// streak activity for `today`.
pub fn apply_activity(
    progress: &mut UserProgress,
    settings: &Settings,
    action: WriteAction,
    today: NaiveDate,
) {
    match action {
        WriteAction::Created { initial_status } => {
            progress.total_applications = progress.total_applications.saturating_add(1);
            record_weekly_activity(progress, today, 1, 0);
            if initial_status.is_interview_stage() {
                progress.total_interviews = progress.total_interviews.saturating_add(1);
            }
        }
        WriteAction::StatusChanged { from, to } => {
            if from == Status::Saved && to != Status::Saved {
                award_xp(progress, XpAward::FirstApply);
            }
            if to.is_interview_stage() {
                progress.total_interviews = progress.total_interviews.saturating_add(1);
                record_weekly_activity(progress, today, 0, 1);
            }
            if to == Status::Offer {
                progress.total_offers = progress.total_offers.saturating_add(1);
                award_xp(progress, XpAward::Offer);
            }
        }
        WriteAction::EventAdded { kind } => match kind {
            EventKind::FollowUp => {
                progress.total_follow_ups = progress.total_follow_ups.saturating_add(1);
                award_xp(progress, XpAward::FollowUp);
            }
            EventKind::Note => award_xp(progress, XpAward::Detail),
            _ => {}
        },
        WriteAction::ContactAdded => award_xp(progress, XpAward::Detail),
    }

    let outcome = gamify::update_streak(progress, today, settings.streak_grace_days);
    if outcome != StreakOutcome::AlreadyCounted {
        debug!(?outcome, streak = progress.current_streak, "streak updated");
    }

    let earned = check_badges(progress);
    if !earned.is_empty() {
        debug!(?earned, "badges earned");
    }
}

#[cfg(test)]
mod tests {
    use super::{WriteAction, apply_activity};
    use huntboard_core::model::application::Status;
    use huntboard_core::model::event::EventKind;
    use huntboard_core::model::progress::{UserProgress, badges};
    use huntboard_core::model::settings::Settings;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
    }

    #[test]
    fn saved_create_earns_no_xp_but_counts() {
        let mut progress = UserProgress::new();
        apply_activity(
            &mut progress,
            &Settings::default(),
            WriteAction::Created {
                initial_status: Status::Saved,
            },
            today(),
        );

        assert_eq!(progress.xp, 0);
        assert_eq!(progress.total_applications, 1);
        assert_eq!(progress.current_streak, 1);
        assert!(progress.badges.contains(badges::FIRST_APPLICATION));
    }

    #[test]
    fn leaving_saved_awards_ten_xp_once() {
        let mut progress = UserProgress::new();
        apply_activity(
            &mut progress,
            &Settings::default(),
            WriteAction::StatusChanged {
                from: Status::Saved,
                to: Status::Applied,
            },
            today(),
        );
        assert_eq!(progress.xp, 10);

        // A later transition is not a departure from saved.
        apply_activity(
            &mut progress,
            &Settings::default(),
            WriteAction::StatusChanged {
                from: Status::Applied,
                to: Status::Screen,
            },
            today(),
        );
        assert_eq!(progress.xp, 10);
        assert_eq!(progress.total_interviews, 1);
        assert!(progress.badges.contains(badges::FIRST_INTERVIEW));
    }

    #[test]
    fn offer_awards_hundred_xp_and_counter() {
        let mut progress = UserProgress::new();
        apply_activity(
            &mut progress,
            &Settings::default(),
            WriteAction::StatusChanged {
                from: Status::Final,
                to: Status::Offer,
            },
            today(),
        );
        assert_eq!(progress.xp, 100);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.total_offers, 1);
        assert!(progress.badges.contains(badges::FIRST_OFFER));
    }

    #[test]
    fn follow_up_event_awards_fifteen() {
        let mut progress = UserProgress::new();
        apply_activity(
            &mut progress,
            &Settings::default(),
            WriteAction::EventAdded {
                kind: EventKind::FollowUp,
            },
            today(),
        );
        assert_eq!(progress.xp, 15);
        assert_eq!(progress.total_follow_ups, 1);
    }

    #[test]
    fn plain_timeline_event_only_touches_streak() {
        let mut progress = UserProgress::new();
        apply_activity(
            &mut progress,
            &Settings::default(),
            WriteAction::EventAdded {
                kind: EventKind::Onsite,
            },
            today(),
        );
        assert_eq!(progress.xp, 0);
        assert_eq!(progress.current_streak, 1);
    }
}
