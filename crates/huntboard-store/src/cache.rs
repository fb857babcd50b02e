//! Read cache with optimistic writes, wrapped around the remote backend.
//!
//! Reads within the TTL are served from memory without touching the
//! transport. Writes mutate the cached list immediately so the UI never
//! waits on the network:
//!
//! - a create inserts a placeholder with a `pending-N` id, swapped for the
//!   server id on success and removed on failure
//! - status changes, patches, and deletes transform the cached rows in
//!   place; on failure the optimistic state is kept and the error is
//!   surfaced for the action boundary to log
//! - any successful write drops the cached list, so the next read refetches
//!   instead of merging

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use huntboard_core::csv::CsvRow;
use huntboard_core::model::application::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, Status,
};
use huntboard_core::model::contact::{Contact, ContactDraft};
use huntboard_core::model::event::{ApplicationEvent, EventDraft, EventKind};
use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::reminder::ReminderDraft;
use huntboard_core::model::settings::{Settings, SettingsPatch};

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::store::Store;

/// How long a fetched list stays fresh, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 30;

struct CachedList {
    apps: Vec<Application>,
    fetched_at: DateTime<Utc>,
}

pub struct CachedStore<S> {
    inner: S,
    clock: Box<dyn Clock>,
    ttl: Duration,
    cached: Option<CachedList>,
    pending_seq: u64,
}

impl<S: Store> CachedStore<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            clock: Box::new(SystemClock),
            ttl,
            cached: None,
            pending_seq: 0,
        }
    }

    /// Replace the time source (tests).
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Direct access to the wrapped store (tests and migration).
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Drop the cached list so the next read refetches.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Bypass the TTL and refetch immediately.
    ///
    /// # Errors
    ///
    /// Backend failure.
    pub fn refresh(&mut self) -> Result<Vec<Application>, StoreError> {
        self.invalidate();
        self.list_applications()
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn fresh_list(&self) -> Option<&CachedList> {
        let cached = self.cached.as_ref()?;
        (self.now() - cached.fetched_at < self.ttl).then_some(cached)
    }

    fn next_pending_id(&mut self) -> ApplicationId {
        self.pending_seq += 1;
        ApplicationId::Remote(format!("pending-{}", self.pending_seq))
    }

    fn placeholder(&mut self, draft: &ApplicationDraft) -> Application {
        let now = self.now();
        Application {
            id: self.next_pending_id(),
            company: draft.company.clone(),
            role: draft.role.clone(),
            location: draft.location.clone(),
            salary: draft.salary.clone(),
            url: draft.url.clone(),
            platform: draft.platform,
            status: draft.status,
            priority: draft.priority,
            archived: false,
            notes: draft.notes.clone(),
            created_at: now,
            updated_at: now,
            applied_at: (draft.status != Status::Saved).then_some(now),
            last_touch_at: now,
        }
    }

    fn transform_cached(&mut self, id: &ApplicationId, apply: impl FnOnce(&mut Application)) {
        if let Some(cached) = self.cached.as_mut()
            && let Some(app) = cached.apps.iter_mut().find(|app| &app.id == id)
        {
            apply(app);
        }
    }
}

impl<S: Store> Store for CachedStore<S> {
    fn list_applications(&mut self) -> Result<Vec<Application>, StoreError> {
        if let Some(cached) = self.fresh_list() {
            return Ok(cached.apps.clone());
        }
        let apps = self.inner.list_applications()?;
        self.cached = Some(CachedList {
            apps: apps.clone(),
            fetched_at: self.now(),
        });
        Ok(apps)
    }

    fn get_application(
        &mut self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, StoreError> {
        if let Some(cached) = self.fresh_list()
            && let Some(app) = cached.apps.iter().find(|app| &app.id == id)
        {
            return Ok(Some(app.clone()));
        }
        self.inner.get_application(id)
    }

    fn create_application(
        &mut self,
        draft: ApplicationDraft,
    ) -> Result<ApplicationId, StoreError> {
        let placeholder = self.placeholder(&draft);
        let pending = placeholder.id.clone();
        if let Some(cached) = self.cached.as_mut() {
            cached.apps.insert(0, placeholder);
        }

        match self.inner.create_application(draft) {
            Ok(id) => {
                self.invalidate();
                Ok(id)
            }
            Err(err) => {
                // Creation is the one optimistic write that rolls back: a
                // placeholder row has no backing record to reconcile with.
                if let Some(cached) = self.cached.as_mut() {
                    cached.apps.retain(|app| app.id != pending);
                }
                warn!(error = %err, "create failed, removed placeholder");
                Err(err)
            }
        }
    }

    fn update_status(&mut self, id: &ApplicationId, status: Status) -> Result<(), StoreError> {
        let now = self.now();
        self.transform_cached(id, |app| {
            if app.status == Status::Saved && status != Status::Saved && app.applied_at.is_none() {
                app.applied_at = Some(now);
            }
            app.status = status;
            app.updated_at = now;
            app.last_touch_at = now;
        });

        match self.inner.update_status(id, status) {
            Ok(()) => {
                self.invalidate();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, %id, "status update failed, keeping optimistic state");
                Err(err)
            }
        }
    }

    fn update_application(
        &mut self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<(), StoreError> {
        let now = self.now();
        self.transform_cached(id, |app| {
            patch.apply_to(app);
            app.updated_at = now;
            app.last_touch_at = now;
        });

        match self.inner.update_application(id, patch) {
            Ok(()) => {
                self.invalidate();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, %id, "update failed, keeping optimistic state");
                Err(err)
            }
        }
    }

    fn delete_application(&mut self, id: &ApplicationId) -> Result<(), StoreError> {
        if let Some(cached) = self.cached.as_mut() {
            cached.apps.retain(|app| &app.id != id);
        }

        match self.inner.delete_application(id) {
            Ok(()) => {
                self.invalidate();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, %id, "delete failed, keeping optimistic state");
                Err(err)
            }
        }
    }

    fn add_event(&mut self, id: &ApplicationId, draft: EventDraft) -> Result<(), StoreError> {
        let now = self.now();
        if draft.kind == EventKind::FollowUp {
            self.transform_cached(id, |app| {
                app.updated_at = now;
                app.last_touch_at = now;
            });
        }
        self.inner.add_event(id, draft)?;
        self.invalidate();
        Ok(())
    }

    fn list_events(&mut self, id: &ApplicationId) -> Result<Vec<ApplicationEvent>, StoreError> {
        self.inner.list_events(id)
    }

    fn add_contact(&mut self, id: &ApplicationId, draft: ContactDraft) -> Result<(), StoreError> {
        self.inner.add_contact(id, draft)
    }

    fn list_contacts(&mut self, id: &ApplicationId) -> Result<Vec<Contact>, StoreError> {
        self.inner.list_contacts(id)
    }

    fn add_reminder(
        &mut self,
        id: &ApplicationId,
        draft: ReminderDraft,
    ) -> Result<(), StoreError> {
        self.inner.add_reminder(id, draft)
    }

    fn get_settings(&mut self) -> Result<Settings, StoreError> {
        self.inner.get_settings()
    }

    fn update_settings(&mut self, patch: SettingsPatch) -> Result<Settings, StoreError> {
        self.inner.update_settings(patch)
    }

    fn get_progress(&mut self) -> Result<UserProgress, StoreError> {
        self.inner.get_progress()
    }

    fn import_application(&mut self, row: &CsvRow) -> Result<ApplicationId, StoreError> {
        let id = self.inner.import_application(row)?;
        self.invalidate();
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::CachedStore;
    use crate::clock::ManualClock;
    use crate::remote::{MemoryTransport, RemoteStore};
    use crate::store::Store;
    use chrono::{Duration, TimeZone, Utc};
    use huntboard_core::model::application::{ApplicationDraft, ApplicationId, Status};

    fn cached_store() -> (CachedStore<RemoteStore<MemoryTransport>>, ManualClock) {
        let clock = ManualClock::at(
            Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0)
                .single()
                .expect("instant"),
        );
        let remote = RemoteStore::new(MemoryTransport::new()).with_clock(clock.clone());
        let store = CachedStore::new(remote).with_clock(clock.clone());
        (store, clock)
    }

    fn list_calls(store: &mut CachedStore<RemoteStore<MemoryTransport>>) -> u32 {
        store.inner_mut().transport_mut().list_calls
    }

    #[test]
    fn reads_within_ttl_skip_the_transport() {
        let (mut store, _clock) = cached_store();
        store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");

        let first = store.list_applications().expect("list");
        let second = store.list_applications().expect("list");
        assert_eq!(first, second);
        assert_eq!(list_calls(&mut store), 1);
    }

    #[test]
    fn reads_after_ttl_refetch() {
        let (mut store, clock) = cached_store();
        store.list_applications().expect("list");
        clock.advance(Duration::seconds(31));
        store.list_applications().expect("list");
        assert_eq!(list_calls(&mut store), 2);
    }

    #[test]
    fn successful_create_invalidates_the_cache() {
        let (mut store, _clock) = cached_store();
        store.list_applications().expect("prime");
        let id = store
            .create_application(ApplicationDraft::new("Figma", "PM"))
            .expect("create");

        let listed = store.list_applications().expect("list");
        assert_eq!(list_calls(&mut store), 2, "write dropped the cached list");
        assert_eq!(listed[0].id, id);
        assert!(!matches!(&listed[0].id, ApplicationId::Remote(raw) if raw.starts_with("pending-")));
    }

    #[test]
    fn failed_create_removes_its_placeholder() {
        let (mut store, _clock) = cached_store();
        store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");
        store.list_applications().expect("prime");

        store.inner_mut().transport_mut().fail_writes = true;
        let err = store.create_application(ApplicationDraft::new("Ghost", "SWE"));
        assert!(err.is_err());

        let listed = store.list_applications().expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].company, "Stripe");
        assert_eq!(list_calls(&mut store), 1, "still served from cache");
    }

    #[test]
    fn failed_status_update_keeps_optimistic_state() {
        let (mut store, _clock) = cached_store();
        let id = store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");
        store.list_applications().expect("prime");

        store.inner_mut().transport_mut().fail_writes = true;
        let err = store.update_status(&id, Status::Applied);
        assert!(err.is_err());

        let listed = store.list_applications().expect("list");
        assert_eq!(listed[0].status, Status::Applied, "optimistic state kept");
        assert!(listed[0].applied_at.is_some());
    }

    #[test]
    fn optimistic_status_change_stamps_applied_at_in_cache() {
        let (mut store, clock) = cached_store();
        let id = store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");
        store.list_applications().expect("prime");

        clock.advance(Duration::seconds(5));
        store.inner_mut().transport_mut().fail_writes = true;
        let _unused = store.update_status(&id, Status::Applied);

        let app = store.get_application(&id).expect("get").expect("cached");
        assert_eq!(app.applied_at, Some(app.updated_at));
    }

    #[test]
    fn delete_removes_from_cache_immediately() {
        let (mut store, _clock) = cached_store();
        let id = store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");
        store.list_applications().expect("prime");

        store.inner_mut().transport_mut().fail_writes = true;
        let _unused = store.delete_application(&id);
        let listed = store.list_applications().expect("list");
        assert!(listed.is_empty());
    }
}
