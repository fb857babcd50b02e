//! Both backends must be indistinguishable through the `Store` trait.
//! Every scenario here runs once against the local SQLite backend and once
//! against the remote backend over the in-memory transport, then compares
//! the observable outcomes.

use chrono::{Duration, TimeZone, Utc};
use huntboard_core::model::application::{Application, ApplicationDraft, Status};
use huntboard_core::model::contact::ContactDraft;
use huntboard_core::model::event::{EventDraft, EventKind};
use huntboard_core::model::progress::UserProgress;
use huntboard_store::clock::ManualClock;
use huntboard_store::remote::{MemoryTransport, RemoteStore};
use huntboard_store::{LocalStore, Store};

fn epoch() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0)
        .single()
        .expect("instant")
}

fn backends() -> Vec<(&'static str, Box<dyn Store>, ManualClock)> {
    let local_clock = ManualClock::at(epoch());
    let local = LocalStore::open_in_memory()
        .expect("local store")
        .with_clock(local_clock.clone());

    let remote_clock = ManualClock::at(epoch());
    let remote = RemoteStore::new(MemoryTransport::new()).with_clock(remote_clock.clone());

    vec![
        ("local", Box::new(local), local_clock),
        ("remote", Box::new(remote), remote_clock),
    ]
}

/// What a caller can observe about one application, minus backend ids.
#[derive(Debug, PartialEq, Eq)]
struct Observed {
    company: String,
    status: Status,
    applied_at_is_updated_at: bool,
    status_change_events: usize,
}

fn observe(store: &mut dyn Store, app: &Application) -> Observed {
    let events = store.list_events(&app.id).expect("events");
    Observed {
        company: app.company.clone(),
        status: app.status,
        applied_at_is_updated_at: app.applied_at == Some(app.updated_at),
        status_change_events: events
            .iter()
            .filter(|e| e.kind == EventKind::StatusChange)
            .count(),
    }
}

#[test]
fn pipeline_walk_is_identical_across_backends() {
    let mut outcomes: Vec<(Observed, UserProgress)> = Vec::new();

    for (name, mut store, clock) in backends() {
        let id = store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .unwrap_or_else(|e| panic!("{name}: create: {e}"));

        clock.advance(Duration::days(1));
        store.update_status(&id, Status::Applied).expect("applied");
        clock.advance(Duration::days(3));
        store.update_status(&id, Status::Screen).expect("screen");
        clock.advance(Duration::days(4));
        store.update_status(&id, Status::Offer).expect("offer");

        let app = store
            .get_application(&id)
            .expect("get")
            .unwrap_or_else(|| panic!("{name}: missing"));
        // applied_at froze at the departure from saved, three stamps ago.
        assert!(app.applied_at.expect("stamped") < app.updated_at);

        let observed = observe(store.as_mut(), &app);
        let progress = store.get_progress().expect("progress");
        outcomes.push((observed, progress));
    }

    let (local, remote) = (outcomes.remove(0), outcomes.remove(0));
    assert_eq!(local.0, remote.0);
    assert_eq!(local.1.xp, remote.1.xp);
    assert_eq!(local.1.level, remote.1.level);
    assert_eq!(local.1.badges, remote.1.badges);
    assert_eq!(local.1.total_offers, remote.1.total_offers);
}

#[test]
fn saved_entry_earns_nothing_on_either_backend() {
    for (name, mut store, _clock) in backends() {
        store
            .create_application(ApplicationDraft::new("Figma", "PM"))
            .unwrap_or_else(|e| panic!("{name}: create: {e}"));

        let progress = store.get_progress().expect("progress");
        assert_eq!(progress.xp, 0, "{name}");
        assert_eq!(progress.total_applications, 1, "{name}");
    }
}

#[test]
fn details_and_follow_ups_award_the_same_xp() {
    for (name, mut store, _clock) in backends() {
        let id = store
            .create_application(ApplicationDraft::new("Linear", "SWE"))
            .expect("create");

        store
            .add_contact(&id, ContactDraft::new("Ana"))
            .expect("contact");
        store
            .add_event(&id, EventDraft::new(EventKind::Note, "Referral intro", epoch()))
            .expect("note");
        store
            .add_event(&id, EventDraft::new(EventKind::FollowUp, "Checked in", epoch()))
            .expect("follow-up");

        let progress = store.get_progress().expect("progress");
        // contact 5 + note 5 + follow-up 15
        assert_eq!(progress.xp, 25, "{name}");
        assert_eq!(progress.total_follow_ups, 1, "{name}");
    }
}

#[test]
fn empty_scope_lists_nothing_on_either_backend() {
    for (name, mut store, _clock) in backends() {
        assert!(
            store.list_applications().expect("list").is_empty(),
            "{name}"
        );
        assert_eq!(store.get_settings().expect("settings").weekly_goal, 8, "{name}");
        assert_eq!(store.get_progress().expect("progress").level, 1, "{name}");
    }
}

#[test]
fn delete_cascades_on_either_backend() {
    for (name, mut store, _clock) in backends() {
        let id = store
            .create_application(ApplicationDraft::new("Acme", "SWE"))
            .expect("create");
        store
            .add_event(&id, EventDraft::new(EventKind::Onsite, "Loop", epoch()))
            .expect("event");
        store
            .add_contact(&id, ContactDraft::new("Ben"))
            .expect("contact");

        store.delete_application(&id).expect("delete");
        assert!(store.get_application(&id).expect("get").is_none(), "{name}");
        assert!(store.list_events(&id).expect("events").is_empty(), "{name}");
        assert!(store.list_contacts(&id).expect("contacts").is_empty(), "{name}");
    }
}
