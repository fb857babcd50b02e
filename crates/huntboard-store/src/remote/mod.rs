//! Account-scope backend: the [`Store`] contract over a remote transport.
//!
//! Timestamps, the applied-date rule, status-change events, and progress
//! updates are all computed here before records cross the wire, so a
//! signed-in scope behaves byte-for-byte like the guest one.

pub mod api;
pub mod http;
pub mod memory;

pub use api::{ApplicationRecord, RemoteTransport};
pub use http::HttpTransport;
pub use memory::MemoryTransport;

use chrono::{DateTime, Utc};
use tracing::debug;

use huntboard_core::csv::CsvRow;
use huntboard_core::model::application::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, Status,
};
use huntboard_core::model::contact::{Contact, ContactDraft};
use huntboard_core::model::event::{ApplicationEvent, EventDraft, EventKind};
use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::reminder::ReminderDraft;
use huntboard_core::model::settings::{Settings, SettingsPatch};

use crate::activity::{WriteAction, apply_activity};
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::store::Store;

use api::{ContactRecord, EventRecord, ReminderRecord};

pub struct RemoteStore<T: RemoteTransport> {
    transport: T,
    clock: Box<dyn Clock>,
}

impl<T: RemoteTransport> RemoteStore<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the time source (tests).
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Direct access to the transport (tests and migration).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn remote_id<'a>(id: &'a ApplicationId) -> Result<&'a str, StoreError> {
        match id {
            ApplicationId::Remote(raw) => Ok(raw),
            ApplicationId::Local(_) => Err(StoreError::NotFound(id.to_string())),
        }
    }

    fn require_record(&mut self, raw: &str) -> Result<ApplicationRecord, StoreError> {
        self.transport
            .get_application(raw)?
            .ok_or_else(|| StoreError::NotFound(raw.to_string()))
    }

    fn record_activity(&mut self, action: WriteAction) -> Result<(), StoreError> {
        let settings = self.transport.get_settings()?.unwrap_or_default();
        let mut progress = self.transport.get_progress()?.unwrap_or_else(UserProgress::new);
        apply_activity(&mut progress, &settings, action, self.now().date_naive());
        self.transport.put_progress(&progress)?;
        Ok(())
    }
}

impl<T: RemoteTransport> Store for RemoteStore<T> {
    fn list_applications(&mut self) -> Result<Vec<Application>, StoreError> {
        let mut apps: Vec<Application> = self
            .transport
            .list_applications()?
            .into_iter()
            .map(|listed| listed.record.into_application(listed.id))
            .collect();
        // The contract orders by recency regardless of server ordering.
        apps.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(apps)
    }

    fn get_application(
        &mut self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, StoreError> {
        let ApplicationId::Remote(raw) = id else {
            return Ok(None);
        };
        Ok(self
            .transport
            .get_application(raw)?
            .map(|record| record.into_application(raw.clone())))
    }

    fn create_application(
        &mut self,
        draft: ApplicationDraft,
    ) -> Result<ApplicationId, StoreError> {
        let now = self.now();
        let record = ApplicationRecord::from_draft(&draft, now);
        let raw = self.transport.create_application(&record)?;

        let created = EventRecord::from_draft(
            &EventDraft::new(EventKind::StatusChange, "Application created", now),
            now,
        );
        self.transport.create_event(&raw, &created)?;
        self.record_activity(WriteAction::Created {
            initial_status: draft.status,
        })?;

        debug!(id = %raw, company = %draft.company, "created application");
        Ok(ApplicationId::Remote(raw))
    }

    fn update_status(&mut self, id: &ApplicationId, status: Status) -> Result<(), StoreError> {
        let raw = Self::remote_id(id)?.to_string();
        let mut record = self.require_record(&raw)?;
        let now = self.now();
        let from = record.status;

        if from == Status::Saved && status != Status::Saved && record.applied_at.is_none() {
            record.applied_at = Some(now);
        }
        record.status = status;
        record.updated_at = now;
        record.last_touch_at = now;
        if !self.transport.put_application(&raw, &record)? {
            return Err(StoreError::NotFound(raw));
        }

        let mut event = EventDraft::new(
            EventKind::StatusChange,
            format!("Status changed to {status}"),
            now,
        );
        event.description = Some(format!("from {from} to {status}"));
        self.transport
            .create_event(&raw, &EventRecord::from_draft(&event, now))?;

        self.record_activity(WriteAction::StatusChanged { from, to: status })?;
        debug!(id = %raw, %from, to = %status, "status transition");
        Ok(())
    }

    fn update_application(
        &mut self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<(), StoreError> {
        let raw = Self::remote_id(id)?.to_string();
        let record = self.require_record(&raw)?;
        let now = self.now();

        let mut app = record.into_application(raw.clone());
        patch.apply_to(&mut app);
        app.updated_at = now;
        app.last_touch_at = now;

        let updated = ApplicationRecord::from_application(&app);
        if !self.transport.put_application(&raw, &updated)? {
            return Err(StoreError::NotFound(raw));
        }
        Ok(())
    }

    fn delete_application(&mut self, id: &ApplicationId) -> Result<(), StoreError> {
        let raw = Self::remote_id(id)?;
        if !self.transport.delete_application(raw)? {
            return Err(StoreError::NotFound(raw.to_string()));
        }
        debug!(id = %raw, "deleted application");
        Ok(())
    }

    fn add_event(&mut self, id: &ApplicationId, draft: EventDraft) -> Result<(), StoreError> {
        let raw = Self::remote_id(id)?.to_string();
        let now = self.now();
        let record = EventRecord::from_draft(&draft, now);
        if !self.transport.create_event(&raw, &record)? {
            return Err(StoreError::NotFound(raw));
        }

        if draft.kind == EventKind::FollowUp {
            let mut parent = self.require_record(&raw)?;
            parent.updated_at = now;
            parent.last_touch_at = now;
            self.transport.put_application(&raw, &parent)?;
        }
        self.record_activity(WriteAction::EventAdded { kind: draft.kind })
    }

    fn list_events(&mut self, id: &ApplicationId) -> Result<Vec<ApplicationEvent>, StoreError> {
        let ApplicationId::Remote(raw) = id else {
            return Ok(Vec::new());
        };
        let mut events: Vec<ApplicationEvent> = self
            .transport
            .list_events(raw)?
            .into_iter()
            .map(|listed| listed.record.into_event(listed.id))
            .collect();
        events.sort_by(|a, b| b.event_date.cmp(&a.event_date).then(b.id.cmp(&a.id)));
        Ok(events)
    }

    fn add_contact(&mut self, id: &ApplicationId, draft: ContactDraft) -> Result<(), StoreError> {
        let raw = Self::remote_id(id)?.to_string();
        let record = ContactRecord::from_draft(&draft, self.now());
        if !self.transport.create_contact(&raw, &record)? {
            return Err(StoreError::NotFound(raw));
        }
        self.record_activity(WriteAction::ContactAdded)
    }

    fn list_contacts(&mut self, id: &ApplicationId) -> Result<Vec<Contact>, StoreError> {
        let ApplicationId::Remote(raw) = id else {
            return Ok(Vec::new());
        };
        Ok(self
            .transport
            .list_contacts(raw)?
            .into_iter()
            .map(|listed| listed.record.into_contact(listed.id))
            .collect())
    }

    fn add_reminder(
        &mut self,
        id: &ApplicationId,
        draft: ReminderDraft,
    ) -> Result<(), StoreError> {
        let raw = Self::remote_id(id)?.to_string();
        let record = ReminderRecord {
            title: draft.title,
            due_at: draft.due_at,
            done: false,
            created_at: self.now(),
        };
        if !self.transport.create_reminder(&raw, &record)? {
            return Err(StoreError::NotFound(raw));
        }
        Ok(())
    }

    fn get_settings(&mut self) -> Result<Settings, StoreError> {
        Ok(self.transport.get_settings()?.unwrap_or_default())
    }

    fn update_settings(&mut self, patch: SettingsPatch) -> Result<Settings, StoreError> {
        let mut settings = self.transport.get_settings()?.unwrap_or_default();
        patch.apply_to(&mut settings);
        self.transport.put_settings(&settings)?;
        Ok(settings)
    }

    fn get_progress(&mut self) -> Result<UserProgress, StoreError> {
        Ok(self.transport.get_progress()?.unwrap_or_else(UserProgress::new))
    }

    fn import_application(&mut self, row: &CsvRow) -> Result<ApplicationId, StoreError> {
        let now = self.now();
        let mut record = ApplicationRecord::from_draft(&row.draft, now);
        record.applied_at = row
            .applied_at
            .or_else(|| (row.draft.status != Status::Saved).then_some(now));
        record.last_touch_at = row.last_touch_at;

        let raw = self.transport.create_application(&record)?;
        self.record_activity(WriteAction::Created {
            initial_status: row.draft.status,
        })?;
        Ok(ApplicationId::Remote(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryTransport, RemoteStore};
    use crate::clock::ManualClock;
    use crate::error::StoreError;
    use crate::store::Store;
    use chrono::{Duration, TimeZone, Utc};
    use huntboard_core::model::application::{ApplicationDraft, ApplicationId, Status};
    use huntboard_core::model::event::EventKind;

    fn store_at_epoch() -> (RemoteStore<MemoryTransport>, ManualClock) {
        let clock = ManualClock::at(
            Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0)
                .single()
                .expect("instant"),
        );
        let store = RemoteStore::new(MemoryTransport::new()).with_clock(clock.clone());
        (store, clock)
    }

    #[test]
    fn stamps_are_computed_client_side() {
        let (mut store, clock) = store_at_epoch();
        let id = store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");
        assert!(matches!(id, ApplicationId::Remote(_)));

        clock.advance(Duration::days(1));
        store.update_status(&id, Status::Applied).expect("apply");

        let app = store.get_application(&id).expect("get").expect("exists");
        assert_eq!(app.applied_at, Some(app.updated_at));
        assert_eq!(store.get_progress().expect("progress").xp, 10);
    }

    #[test]
    fn transitions_append_status_change_events() {
        let (mut store, _clock) = store_at_epoch();
        let id = store
            .create_application(ApplicationDraft::new("Figma", "PM"))
            .expect("create");
        store.update_status(&id, Status::Applied).expect("t1");

        let events = store.list_events(&id).expect("events");
        let changes = events
            .iter()
            .filter(|e| e.kind == EventKind::StatusChange)
            .count();
        assert_eq!(changes, 2);
    }

    #[test]
    fn local_ids_do_not_resolve_in_account_scope() {
        let (mut store, _clock) = store_at_epoch();
        let foreign = ApplicationId::Local(7);
        assert!(store.get_application(&foreign).expect("get").is_none());
        assert!(matches!(
            store.update_status(&foreign, Status::Applied),
            Err(StoreError::NotFound(_))
        ));
    }
}
