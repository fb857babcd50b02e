//! Derived views: staleness, suggested next actions, and analytics.
//!
//! Everything here is a pure function over application lists and settings.
//! `now` is always a parameter; these are safe to call repeatedly and never
//! touch a store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::application::{Application, ApplicationId, Platform, Priority, Status};
use crate::model::settings::Settings;

/// Interview-stage applications touched more recently than this many days
/// ago get a prep suggestion.
const PREP_WINDOW_DAYS: i64 = 3;

/// Whole days the application has sat in its current stage.
#[must_use]
pub fn days_in_stage(app: &Application, now: DateTime<Utc>) -> i64 {
    (now - app.updated_at).num_days()
}

/// Whole days since the last meaningful interaction.
#[must_use]
pub fn days_since_last_touch(app: &Application, now: DateTime<Utc>) -> i64 {
    (now - app.last_touch_at).num_days()
}

/// Whether the application needs attention. Terminal statuses are never
/// stale, no matter how old the last touch is.
#[must_use]
pub fn is_stale(app: &Application, follow_up_days: u32, now: DateTime<Utc>) -> bool {
    if app.status.is_terminal() {
        return false;
    }
    days_since_last_touch(app, now) >= i64::from(follow_up_days)
}

/// What a suggestion asks the user to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Apply,
    FollowUp,
    Prep,
}

/// A single suggested action for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAction {
    pub kind: ActionKind,
    pub priority: Priority,
    pub application_id: ApplicationId,
    pub company: String,
    pub role: String,
}

impl NextAction {
    fn for_app(app: &Application, kind: ActionKind, priority: Priority) -> Self {
        Self {
            kind,
            priority,
            application_id: app.id.clone(),
            company: app.company.clone(),
            role: app.role.clone(),
        }
    }
}

/// Suggested actions across the board, sorted high → medium → low (stable
/// within a tier).
///
/// Rules:
/// - every `saved` application gets an `apply` at its own priority
///   (medium when unset);
/// - `applied` applications past `follow_up_days` since last touch get a
///   high-priority `follow-up`;
/// - interview-stage applications past `interview_follow_up_days` get a
///   high-priority `follow-up`;
/// - interview-stage applications touched within the last 3 days get a
///   high-priority `prep`.
///
/// Terminal and archived applications are excluded. An interview-stage
/// application can surface both a follow-up and a prep near the window
/// boundary; that duplication is intentional and left to the caller.
#[must_use]
pub fn next_actions(
    apps: &[Application],
    settings: &Settings,
    now: DateTime<Utc>,
) -> Vec<NextAction> {
    let mut actions = Vec::new();

    for app in apps {
        if app.status.is_terminal() || app.archived {
            continue;
        }

        let idle = days_since_last_touch(app, now);

        match app.status {
            Status::Saved => {
                actions.push(NextAction::for_app(
                    app,
                    ActionKind::Apply,
                    app.effective_priority(),
                ));
            }
            Status::Applied => {
                if idle >= i64::from(settings.follow_up_days) {
                    actions.push(NextAction::for_app(
                        app,
                        ActionKind::FollowUp,
                        Priority::High,
                    ));
                }
            }
            _ if app.status.is_interview_stage() => {
                if idle >= i64::from(settings.interview_follow_up_days) {
                    actions.push(NextAction::for_app(
                        app,
                        ActionKind::FollowUp,
                        Priority::High,
                    ));
                }
                if idle < PREP_WINDOW_DAYS {
                    actions.push(NextAction::for_app(app, ActionKind::Prep, Priority::High));
                }
            }
            _ => {}
        }
    }

    actions.sort_by_key(|action| action.priority.rank());
    actions
}

/// Funnel rates for one platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total: u32,
    pub applied: u32,
    pub response_rate: u32,
    pub interview_rate: u32,
}

/// Aggregate funnel metrics over an application list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analytics {
    pub total: u32,
    pub applied: u32,
    /// Percent of applied that got any response (left saved/applied and
    /// were not ghosted). Rejections count as responses.
    pub response_rate: u32,
    /// Percent of applied that reached an interview stage or offer.
    pub interview_rate: u32,
    /// Rounded mean days from `applied_at` to the responding update, over
    /// applications with a positive gap. Zero when there are no samples.
    pub avg_time_to_response_days: u32,
    pub platforms: BTreeMap<Platform, PlatformStats>,
}

const fn responded(status: Status) -> bool {
    !matches!(status, Status::Saved | Status::Applied | Status::Ghosted)
}

const fn interviewed(status: Status) -> bool {
    status.is_interview_stage() || matches!(status, Status::Offer)
}

/// Percentage with round-half-up, 0 when the denominator is 0.
fn rate(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (numerator * 100 + denominator / 2) / denominator
}

/// Compute dashboard analytics for an application list.
#[must_use]
pub fn calculate_analytics(apps: &[Application]) -> Analytics {
    let mut analytics = Analytics::default();
    let mut response_day_sum: i64 = 0;
    let mut response_samples: i64 = 0;

    for app in apps {
        analytics.total += 1;
        let platform = analytics.platforms.entry(app.platform).or_default();
        platform.total += 1;

        if app.status == Status::Saved {
            continue;
        }
        analytics.applied += 1;
        platform.applied += 1;

        if responded(app.status) {
            analytics.response_rate += 1;
            platform.response_rate += 1;

            if let Some(applied_at) = app.applied_at {
                let gap = (app.updated_at - applied_at).num_days();
                if gap > 0 {
                    response_day_sum += gap;
                    response_samples += 1;
                }
            }
        }
        if interviewed(app.status) {
            analytics.interview_rate += 1;
            platform.interview_rate += 1;
        }
    }

    // Counters accumulated above become rates here.
    analytics.response_rate = rate(analytics.response_rate, analytics.applied);
    analytics.interview_rate = rate(analytics.interview_rate, analytics.applied);
    for platform in analytics.platforms.values_mut() {
        platform.response_rate = rate(platform.response_rate, platform.applied);
        platform.interview_rate = rate(platform.interview_rate, platform.applied);
    }

    if response_samples > 0 {
        let mean = (response_day_sum + response_samples / 2) / response_samples;
        analytics.avg_time_to_response_days = u32::try_from(mean).unwrap_or(0);
    }

    analytics
}

#[cfg(test)]
mod tests {
    use super::{
        ActionKind, calculate_analytics, days_in_stage, days_since_last_touch, is_stale,
        next_actions,
    };
    use crate::model::application::{Application, ApplicationId, Platform, Priority, Status};
    use crate::model::settings::Settings;
    use chrono::{DateTime, Duration, Utc};

    fn at(now: DateTime<Utc>, days_ago: i64) -> DateTime<Utc> {
        now - Duration::days(days_ago)
    }

    fn app(id: i64, status: Status, touched_days_ago: i64, now: DateTime<Utc>) -> Application {
        Application {
            id: ApplicationId::Local(id),
            company: format!("Company {id}"),
            role: "Engineer".to_string(),
            location: None,
            salary: None,
            url: None,
            platform: Platform::Linkedin,
            status,
            priority: None,
            archived: false,
            notes: None,
            created_at: at(now, 30),
            updated_at: at(now, touched_days_ago),
            applied_at: if status == Status::Saved {
                None
            } else {
                Some(at(now, 20))
            },
            last_touch_at: at(now, touched_days_ago),
        }
    }

    #[test]
    fn day_counters_floor_whole_days() {
        let now = Utc::now();
        let mut a = app(1, Status::Applied, 0, now);
        a.updated_at = now - Duration::hours(47);
        a.last_touch_at = now - Duration::hours(25);
        assert_eq!(days_in_stage(&a, now), 1);
        assert_eq!(days_since_last_touch(&a, now), 1);
    }

    #[test]
    fn terminal_statuses_are_never_stale() {
        let now = Utc::now();
        for status in [Status::Offer, Status::Rejected, Status::Ghosted] {
            let a = app(1, status, 100, now);
            assert!(!is_stale(&a, 7, now), "{status} should never be stale");
        }
    }

    #[test]
    fn applied_goes_stale_at_threshold() {
        let now = Utc::now();
        assert!(is_stale(&app(1, Status::Applied, 7, now), 7, now));
        assert!(!is_stale(&app(2, Status::Applied, 6, now), 7, now));
    }

    #[test]
    fn overdue_applied_yields_exactly_one_high_follow_up() {
        let now = Utc::now();
        let apps = vec![app(1, Status::Applied, 10, now)];
        let actions = next_actions(&apps, &Settings::default(), now);

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::FollowUp);
        assert_eq!(actions[0].priority, Priority::High);
        assert_eq!(actions[0].application_id, ApplicationId::Local(1));
    }

    #[test]
    fn saved_apps_get_apply_at_their_own_priority() {
        let now = Utc::now();
        let mut low = app(1, Status::Saved, 0, now);
        low.priority = Some(Priority::Low);
        let plain = app(2, Status::Saved, 0, now);

        let actions = next_actions(&[low, plain], &Settings::default(), now);
        assert_eq!(actions.len(), 2);
        // Stable sort puts the defaulted-medium app before the low one.
        assert_eq!(actions[0].application_id, ApplicationId::Local(2));
        assert_eq!(actions[0].priority, Priority::Medium);
        assert_eq!(actions[1].priority, Priority::Low);
    }

    #[test]
    fn fresh_interview_stage_gets_prep() {
        let now = Utc::now();
        let apps = vec![app(1, Status::Interview1, 1, now)];
        let actions = next_actions(&apps, &Settings::default(), now);

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::Prep);
        assert_eq!(actions[0].priority, Priority::High);
    }

    #[test]
    fn interview_stage_at_boundary_gets_follow_up_and_prep() {
        // With interview_follow_up_days = 2, an app idle exactly 2 days is
        // both overdue (>= 2) and inside the 3-day prep window (< 3).
        let now = Utc::now();
        let apps = vec![app(1, Status::Screen, 2, now)];
        let actions = next_actions(&apps, &Settings::default(), now);

        let kinds: Vec<ActionKind> = actions.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![ActionKind::FollowUp, ActionKind::Prep]);
    }

    #[test]
    fn terminal_and_archived_apps_generate_nothing() {
        let now = Utc::now();
        let mut archived = app(1, Status::Saved, 0, now);
        archived.archived = true;
        let apps = vec![
            archived,
            app(2, Status::Offer, 10, now),
            app(3, Status::Rejected, 10, now),
            app(4, Status::Ghosted, 10, now),
        ];
        assert!(next_actions(&apps, &Settings::default(), now).is_empty());
    }

    #[test]
    fn analytics_empty_list_is_all_zero() {
        let analytics = calculate_analytics(&[]);
        assert_eq!(analytics.total, 0);
        assert_eq!(analytics.applied, 0);
        assert_eq!(analytics.response_rate, 0);
        assert_eq!(analytics.interview_rate, 0);
        assert_eq!(analytics.avg_time_to_response_days, 0);
    }

    #[test]
    fn analytics_rates_count_rejections_as_responses() {
        let now = Utc::now();
        let apps = vec![
            app(1, Status::Saved, 0, now),
            app(2, Status::Applied, 0, now),
            app(3, Status::Rejected, 0, now),
            app(4, Status::Screen, 0, now),
        ];
        let analytics = calculate_analytics(&apps);

        assert_eq!(analytics.total, 4);
        assert_eq!(analytics.applied, 3);
        // Responded: rejected + screen = 2 of 3 applied.
        assert_eq!(analytics.response_rate, 67);
        // Interviewed: screen = 1 of 3.
        assert_eq!(analytics.interview_rate, 33);
    }

    #[test]
    fn analytics_mean_response_days_skips_non_positive_gaps() {
        let now = Utc::now();
        let mut fast = app(1, Status::Screen, 0, now);
        fast.applied_at = Some(at(now, 4));
        fast.updated_at = at(now, 0);

        let mut same_day = app(2, Status::Rejected, 0, now);
        same_day.applied_at = Some(at(now, 0));
        same_day.updated_at = at(now, 0);

        let analytics = calculate_analytics(&[fast, same_day]);
        assert_eq!(analytics.avg_time_to_response_days, 4);
    }

    #[test]
    fn analytics_breaks_down_per_platform() {
        let now = Utc::now();
        let mut indeed = app(1, Status::Offer, 0, now);
        indeed.platform = Platform::Indeed;
        let linkedin_saved = app(2, Status::Saved, 0, now);
        let linkedin_applied = app(3, Status::Applied, 0, now);

        let analytics = calculate_analytics(&[indeed, linkedin_saved, linkedin_applied]);
        let indeed_stats = analytics.platforms[&Platform::Indeed];
        assert_eq!(indeed_stats.total, 1);
        assert_eq!(indeed_stats.response_rate, 100);
        assert_eq!(indeed_stats.interview_rate, 100);

        let linkedin_stats = analytics.platforms[&Platform::Linkedin];
        assert_eq!(linkedin_stats.total, 2);
        assert_eq!(linkedin_stats.applied, 1);
        assert_eq!(linkedin_stats.response_rate, 0);
    }
}
