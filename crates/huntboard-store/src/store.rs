//! The storage contract shared by both backends.
//!
//! Everything above this trait is backend-agnostic: UI layers and the CLI
//! talk to a [`Store`] and never learn whether records live in the local
//! SQLite file or behind the remote transport. The single place that picks
//! a backend is [`crate::dispatch::ScopedStore`].

use huntboard_core::csv::CsvRow;
use huntboard_core::model::application::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, Status,
};
use huntboard_core::model::contact::{Contact, ContactDraft};
use huntboard_core::model::event::{ApplicationEvent, EventDraft};
use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::reminder::ReminderDraft;
use huntboard_core::model::settings::{Settings, SettingsPatch};

use crate::error::StoreError;

/// Read/write contract over one scope's table set. Both backends implement
/// identical semantics:
///
/// - Lists are ordered newest `updated_at` first and an empty scope yields
///   an empty list, never an error.
/// - Creation stamps all timestamps; `applied_at` only when the draft
///   status is not `saved`.
/// - Status transitions stamp `updated_at`/`last_touch_at`, stamp
///   `applied_at` on the first departure from `saved` (and never again),
///   append exactly one `status-change` event, and feed the gamification
///   engine.
/// - Deletes cascade to the application's events, contacts, and reminders.
pub trait Store {
    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn list_applications(&mut self) -> Result<Vec<Application>, StoreError>;

    /// `Ok(None)` when the id does not exist in this scope.
    ///
    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn get_application(&mut self, id: &ApplicationId)
    -> Result<Option<Application>, StoreError>;

    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn create_application(&mut self, draft: ApplicationDraft)
    -> Result<ApplicationId, StoreError>;

    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id does not exist, otherwise
    /// backend failure.
    fn update_status(&mut self, id: &ApplicationId, status: Status) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id does not exist, otherwise
    /// backend failure.
    fn update_application(
        &mut self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the id does not exist, otherwise
    /// backend failure.
    fn delete_application(&mut self, id: &ApplicationId) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the parent does not exist, otherwise
    /// backend failure.
    fn add_event(&mut self, id: &ApplicationId, draft: EventDraft) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn list_events(&mut self, id: &ApplicationId) -> Result<Vec<ApplicationEvent>, StoreError>;

    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the parent does not exist, otherwise
    /// backend failure.
    fn add_contact(&mut self, id: &ApplicationId, draft: ContactDraft) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn list_contacts(&mut self, id: &ApplicationId) -> Result<Vec<Contact>, StoreError>;

    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the parent does not exist, otherwise
    /// backend failure.
    fn add_reminder(&mut self, id: &ApplicationId, draft: ReminderDraft)
    -> Result<(), StoreError>;

    /// Defaults when no row exists yet.
    ///
    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn get_settings(&mut self) -> Result<Settings, StoreError>;

    /// Returns the settings after the patch.
    ///
    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn update_settings(&mut self, patch: SettingsPatch) -> Result<Settings, StoreError>;

    /// Fresh level-1 progress when no row exists yet.
    ///
    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn get_progress(&mut self) -> Result<UserProgress, StoreError>;

    /// Insert one parsed CSV row, keeping the file's applied and last-touch
    /// dates instead of stamping fresh ones.
    ///
    /// # Errors
    ///
    /// Backend failure (SQLite or transport).
    fn import_application(&mut self, row: &CsvRow) -> Result<ApplicationId, StoreError>;
}
