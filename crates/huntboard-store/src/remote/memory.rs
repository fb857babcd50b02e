//! In-memory reference transport.
//!
//! The behavioral twin of the real server: tests run scope-parity and
//! migration scenarios against it, and it doubles as the offline fixture
//! backend. Write failures can be injected to exercise the optimistic
//! cache paths.

use std::collections::BTreeMap;

use huntboard_core::model::application::Status;
use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::settings::Settings;

use crate::clock::{Clock, SystemClock};
use crate::error::TransportError;
use crate::migrate::MigrationBundle;

use super::api::{
    ApplicationRecord, ContactRecord, EventRecord, ReminderRecord, RemoteApplication,
    RemoteContact, RemoteEvent, RemoteTransport,
};

#[derive(Default)]
struct OwnedRows {
    events: Vec<RemoteEvent>,
    contacts: Vec<RemoteContact>,
    reminders: Vec<ReminderRecord>,
}

pub struct MemoryTransport {
    apps: BTreeMap<String, ApplicationRecord>,
    owned: BTreeMap<String, OwnedRows>,
    settings: Option<Settings>,
    progress: Option<UserProgress>,
    next_app: u64,
    next_child: i64,
    clock: Box<dyn Clock>,
    /// When set, every mutating call fails with a 503.
    pub fail_writes: bool,
    /// Counts `list_applications` round trips (cache assertions).
    pub list_calls: u32,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            apps: BTreeMap::new(),
            owned: BTreeMap::new(),
            settings: None,
            progress: None,
            next_app: 0,
            next_child: 0,
            clock: Box::new(SystemClock),
            fail_writes: false,
            list_calls: 0,
        }
    }

    /// Replace the time source used to stamp bulk-created rows (tests).
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn guard_writes(&self) -> Result<(), TransportError> {
        if self.fail_writes {
            return Err(TransportError::Status(503));
        }
        Ok(())
    }

    fn next_app_id(&mut self) -> String {
        self.next_app += 1;
        format!("app_{}", self.next_app)
    }

    fn next_child_id(&mut self) -> i64 {
        self.next_child += 1;
        self.next_child
    }
}

impl RemoteTransport for MemoryTransport {
    fn list_applications(&mut self) -> Result<Vec<RemoteApplication>, TransportError> {
        self.list_calls += 1;
        Ok(self
            .apps
            .iter()
            .map(|(id, record)| RemoteApplication {
                id: id.clone(),
                record: record.clone(),
            })
            .collect())
    }

    fn get_application(&mut self, id: &str) -> Result<Option<ApplicationRecord>, TransportError> {
        Ok(self.apps.get(id).cloned())
    }

    fn create_application(&mut self, record: &ApplicationRecord) -> Result<String, TransportError> {
        self.guard_writes()?;
        let id = self.next_app_id();
        self.apps.insert(id.clone(), record.clone());
        self.owned.insert(id.clone(), OwnedRows::default());
        Ok(id)
    }

    fn put_application(
        &mut self,
        id: &str,
        record: &ApplicationRecord,
    ) -> Result<bool, TransportError> {
        self.guard_writes()?;
        match self.apps.get_mut(id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_application(&mut self, id: &str) -> Result<bool, TransportError> {
        self.guard_writes()?;
        self.owned.remove(id);
        Ok(self.apps.remove(id).is_some())
    }

    fn create_event(&mut self, id: &str, record: &EventRecord) -> Result<bool, TransportError> {
        self.guard_writes()?;
        if !self.apps.contains_key(id) {
            return Ok(false);
        }
        let child = self.next_child_id();
        if let Some(rows) = self.owned.get_mut(id) {
            rows.events.push(RemoteEvent {
                id: child,
                record: record.clone(),
            });
        }
        Ok(true)
    }

    fn list_events(&mut self, id: &str) -> Result<Vec<RemoteEvent>, TransportError> {
        Ok(self.owned.get(id).map(|rows| rows.events.clone()).unwrap_or_default())
    }

    fn create_contact(&mut self, id: &str, record: &ContactRecord) -> Result<bool, TransportError> {
        self.guard_writes()?;
        if !self.apps.contains_key(id) {
            return Ok(false);
        }
        let child = self.next_child_id();
        if let Some(rows) = self.owned.get_mut(id) {
            rows.contacts.push(RemoteContact {
                id: child,
                record: record.clone(),
            });
        }
        Ok(true)
    }

    fn list_contacts(&mut self, id: &str) -> Result<Vec<RemoteContact>, TransportError> {
        Ok(self
            .owned
            .get(id)
            .map(|rows| rows.contacts.clone())
            .unwrap_or_default())
    }

    fn create_reminder(
        &mut self,
        id: &str,
        record: &ReminderRecord,
    ) -> Result<bool, TransportError> {
        self.guard_writes()?;
        if !self.apps.contains_key(id) {
            return Ok(false);
        }
        if let Some(rows) = self.owned.get_mut(id) {
            rows.reminders.push(record.clone());
        }
        Ok(true)
    }

    fn get_settings(&mut self) -> Result<Option<Settings>, TransportError> {
        Ok(self.settings.clone())
    }

    fn put_settings(&mut self, settings: &Settings) -> Result<(), TransportError> {
        self.guard_writes()?;
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn get_progress(&mut self) -> Result<Option<UserProgress>, TransportError> {
        Ok(self.progress.clone())
    }

    fn put_progress(&mut self, progress: &UserProgress) -> Result<(), TransportError> {
        self.guard_writes()?;
        self.progress = Some(progress.clone());
        Ok(())
    }

    fn bulk_create(&mut self, bundles: &[MigrationBundle]) -> Result<u32, TransportError> {
        self.guard_writes()?;
        let now = self.clock.now();
        for bundle in bundles {
            let mut record = ApplicationRecord::from_draft(&bundle.application, now);
            // Imported rows keep the rule: a status past `saved` implies an
            // applied date, even though the original one did not travel.
            if bundle.application.status != Status::Saved && record.applied_at.is_none() {
                record.applied_at = Some(now);
            }
            let id = self.next_app_id();
            self.apps.insert(id.clone(), record);

            let mut rows = OwnedRows::default();
            for event in &bundle.events {
                let child = self.next_child_id();
                rows.events.push(RemoteEvent {
                    id: child,
                    record: EventRecord::from_draft(event, now),
                });
            }
            for contact in &bundle.contacts {
                let child = self.next_child_id();
                rows.contacts.push(RemoteContact {
                    id: child,
                    record: ContactRecord::from_draft(contact, now),
                });
            }
            for reminder in &bundle.reminders {
                rows.reminders.push(ReminderRecord {
                    title: reminder.title.clone(),
                    due_at: reminder.due_at,
                    done: false,
                    created_at: now,
                });
            }
            self.owned.insert(id, rows);
        }
        Ok(u32::try_from(bundles.len()).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryTransport;
    use crate::error::TransportError;
    use crate::remote::api::{ApplicationRecord, RemoteTransport};
    use chrono::Utc;
    use huntboard_core::model::application::ApplicationDraft;

    #[test]
    fn create_assigns_sequential_server_ids() {
        let mut transport = MemoryTransport::new();
        let record = ApplicationRecord::from_draft(&ApplicationDraft::new("A", "SWE"), Utc::now());
        assert_eq!(transport.create_application(&record).unwrap(), "app_1");
        assert_eq!(transport.create_application(&record).unwrap(), "app_2");
    }

    #[test]
    fn injected_failure_rejects_writes_but_not_reads() {
        let mut transport = MemoryTransport::new();
        let record = ApplicationRecord::from_draft(&ApplicationDraft::new("A", "SWE"), Utc::now());
        let id = transport.create_application(&record).unwrap();

        transport.fail_writes = true;
        assert!(matches!(
            transport.put_application(&id, &record),
            Err(TransportError::Status(503))
        ));
        assert!(transport.get_application(&id).unwrap().is_some());
    }

    #[test]
    fn put_on_missing_id_reports_false() {
        let mut transport = MemoryTransport::new();
        let record = ApplicationRecord::from_draft(&ApplicationDraft::new("A", "SWE"), Utc::now());
        assert!(!transport.put_application("app_404", &record).unwrap());
    }
}
