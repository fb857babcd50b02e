//! Wire shapes and the transport contract for the account-scope backend.
//!
//! The transport is dumb CRUD: it moves records and never computes
//! timestamps, XP, or transitions. All stamping happens in
//! [`RemoteStore`](super::RemoteStore) before a record goes on the wire, so
//! the remote scope behaves exactly like the local one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use huntboard_core::model::application::{
    Application, ApplicationDraft, ApplicationId, Platform, Priority, Status,
};
use huntboard_core::model::contact::{Contact, ContactDraft};
use huntboard_core::model::event::{ApplicationEvent, EventDraft, EventKind};
use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::settings::Settings;

use crate::error::TransportError;
use crate::migrate::MigrationBundle;

/// An application as it travels over the wire, without its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub url: Option<String>,
    pub platform: Platform,
    pub status: Status,
    pub priority: Option<Priority>,
    pub archived: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub applied_at: Option<DateTime<Utc>>,
    pub last_touch_at: DateTime<Utc>,
}

impl ApplicationRecord {
    /// Stamp a fresh record from a draft. `applied_at` only when the draft
    /// status already left `saved`.
    #[must_use]
    pub fn from_draft(draft: &ApplicationDraft, now: DateTime<Utc>) -> Self {
        Self {
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

    #[must_use]
    pub fn from_application(app: &Application) -> Self {
        Self {
            company: app.company.clone(),
            role: app.role.clone(),
            location: app.location.clone(),
            salary: app.salary.clone(),
            url: app.url.clone(),
            platform: app.platform,
            status: app.status,
            priority: app.priority,
            archived: app.archived,
            notes: app.notes.clone(),
            created_at: app.created_at,
            updated_at: app.updated_at,
            applied_at: app.applied_at,
            last_touch_at: app.last_touch_at,
        }
    }

    #[must_use]
    pub fn into_application(self, id: String) -> Application {
        Application {
            id: ApplicationId::Remote(id),
            company: self.company,
            role: self.role,
            location: self.location,
            salary: self.salary,
            url: self.url,
            platform: self.platform,
            status: self.status,
            priority: self.priority,
            archived: self.archived,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            applied_at: self.applied_at,
            last_touch_at: self.last_touch_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub kind: EventKind,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub completed: bool,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl EventRecord {
    #[must_use]
    pub fn from_draft(draft: &EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            kind: draft.kind,
            title: draft.title.clone(),
            description: draft.description.clone(),
            event_date: draft.event_date,
            created_at: now,
            completed: draft.completed,
            scheduled_at: draft.scheduled_at,
        }
    }

    #[must_use]
    pub fn into_event(self, id: i64) -> ApplicationEvent {
        ApplicationEvent {
            id,
            kind: self.kind,
            title: self.title,
            description: self.description,
            event_date: self.event_date,
            created_at: self.created_at,
            completed: self.completed,
            scheduled_at: self.scheduled_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub name: String,
    pub role: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    #[must_use]
    pub fn from_draft(draft: &ContactDraft, now: DateTime<Utc>) -> Self {
        Self {
            name: draft.name.clone(),
            role: draft.role.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            linkedin: draft.linkedin.clone(),
            notes: draft.notes.clone(),
            created_at: now,
        }
    }

    #[must_use]
    pub fn into_contact(self, id: i64) -> Contact {
        Contact {
            id,
            name: self.name,
            role: self.role,
            email: self.email,
            phone: self.phone,
            linkedin: self.linkedin,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRecord {
    pub title: String,
    pub due_at: DateTime<Utc>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// A listed application: server id plus record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteApplication {
    pub id: String,
    #[serde(flatten)]
    pub record: ApplicationRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEvent {
    pub id: i64,
    #[serde(flatten)]
    pub record: EventRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteContact {
    pub id: i64,
    #[serde(flatten)]
    pub record: ContactRecord,
}

/// CRUD over one identity's partition. Mutating calls that target a
/// specific id report `Ok(false)` when the id does not exist, so the store
/// can map that to its own not-found error.
pub trait RemoteTransport {
    /// # Errors
    ///
    /// Transport failure.
    fn list_applications(&mut self) -> Result<Vec<RemoteApplication>, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn get_application(&mut self, id: &str) -> Result<Option<ApplicationRecord>, TransportError>;

    /// Returns the server-assigned id.
    ///
    /// # Errors
    ///
    /// Transport failure.
    fn create_application(&mut self, record: &ApplicationRecord) -> Result<String, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn put_application(
        &mut self,
        id: &str,
        record: &ApplicationRecord,
    ) -> Result<bool, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn delete_application(&mut self, id: &str) -> Result<bool, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn create_event(&mut self, id: &str, record: &EventRecord) -> Result<bool, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn list_events(&mut self, id: &str) -> Result<Vec<RemoteEvent>, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn create_contact(&mut self, id: &str, record: &ContactRecord) -> Result<bool, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn list_contacts(&mut self, id: &str) -> Result<Vec<RemoteContact>, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn create_reminder(
        &mut self,
        id: &str,
        record: &ReminderRecord,
    ) -> Result<bool, TransportError>;

    /// `Ok(None)` when the identity has no settings row yet.
    ///
    /// # Errors
    ///
    /// Transport failure.
    fn get_settings(&mut self) -> Result<Option<Settings>, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn put_settings(&mut self, settings: &Settings) -> Result<(), TransportError>;

    /// `Ok(None)` when the identity has no progress row yet.
    ///
    /// # Errors
    ///
    /// Transport failure.
    fn get_progress(&mut self) -> Result<Option<UserProgress>, TransportError>;

    /// # Errors
    ///
    /// Transport failure.
    fn put_progress(&mut self, progress: &UserProgress) -> Result<(), TransportError>;

    /// Atomic bulk insert for the guest-data migration. Returns the number
    /// of applications created; on error nothing is kept.
    ///
    /// # Errors
    ///
    /// Transport failure.
    fn bulk_create(&mut self, bundles: &[MigrationBundle]) -> Result<u32, TransportError>;
}
