//! Scope-to-backend routing.
//!
//! The single place that decides where records live: guests get the local
//! SQLite file, signed-in identities get the cached remote backend. Above
//! this point nothing ever branches on scope.

use chrono::Duration;

use huntboard_core::config::AppConfig;
use huntboard_core::csv::CsvRow;
use huntboard_core::model::application::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, Status,
};
use huntboard_core::model::contact::{Contact, ContactDraft};
use huntboard_core::model::event::{ApplicationEvent, EventDraft};
use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::reminder::ReminderDraft;
use huntboard_core::model::settings::{Settings, SettingsPatch};

use crate::cache::CachedStore;
use crate::error::{StoreError, TransportError};
use crate::local::LocalStore;
use crate::remote::{HttpTransport, RemoteStore, RemoteTransport};
use crate::scope::Scope;
use crate::store::Store;

pub const LOCAL_DB_FILE: &str = "huntboard.db";

pub enum ScopedStore<T: RemoteTransport> {
    Guest(LocalStore),
    Account(CachedStore<RemoteStore<T>>),
}

impl<T: RemoteTransport> ScopedStore<T> {
    pub const fn guest(local: LocalStore) -> Self {
        Self::Guest(local)
    }

    pub const fn account(cached: CachedStore<RemoteStore<T>>) -> Self {
        Self::Account(cached)
    }
}

/// Open the backend for the active scope.
///
/// # Errors
///
/// [`StoreError::AuthRequired`] when the scope is signed in but no API
/// token is configured; a transport error when `remote.base_url` is
/// missing; SQLite errors for the guest scope.
pub fn open_scoped(
    config: &AppConfig,
    scope: &Scope,
) -> Result<ScopedStore<HttpTransport>, StoreError> {
    match scope {
        Scope::Guest => {
            let path = config.resolve_data_dir().join(LOCAL_DB_FILE);
            Ok(ScopedStore::Guest(LocalStore::open(&path)?))
        }
        Scope::Account(_) => {
            let base_url = config.remote.base_url.as_deref().ok_or_else(|| {
                TransportError::Request("remote.base_url is not configured".to_string())
            })?;
            let token = config
                .remote
                .api_token
                .as_deref()
                .ok_or(StoreError::AuthRequired)?;
            let transport = HttpTransport::new(base_url, token)?;
            let ttl = Duration::seconds(i64::try_from(config.cache.ttl_secs).unwrap_or(30));
            Ok(ScopedStore::Account(CachedStore::with_ttl(
                RemoteStore::new(transport),
                ttl,
            )))
        }
    }
}

impl<T: RemoteTransport> Store for ScopedStore<T> {
    fn list_applications(&mut self) -> Result<Vec<Application>, StoreError> {
        match self {
            Self::Guest(store) => store.list_applications(),
            Self::Account(store) => store.list_applications(),
        }
    }

    fn get_application(
        &mut self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, StoreError> {
        match self {
            Self::Guest(store) => store.get_application(id),
            Self::Account(store) => store.get_application(id),
        }
    }

    fn create_application(
        &mut self,
        draft: ApplicationDraft,
    ) -> Result<ApplicationId, StoreError> {
        match self {
            Self::Guest(store) => store.create_application(draft),
            Self::Account(store) => store.create_application(draft),
        }
    }

    fn update_status(&mut self, id: &ApplicationId, status: Status) -> Result<(), StoreError> {
        match self {
            Self::Guest(store) => store.update_status(id, status),
            Self::Account(store) => store.update_status(id, status),
        }
    }

    fn update_application(
        &mut self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<(), StoreError> {
        match self {
            Self::Guest(store) => store.update_application(id, patch),
            Self::Account(store) => store.update_application(id, patch),
        }
    }

    fn delete_application(&mut self, id: &ApplicationId) -> Result<(), StoreError> {
        match self {
            Self::Guest(store) => store.delete_application(id),
            Self::Account(store) => store.delete_application(id),
        }
    }

    fn add_event(&mut self, id: &ApplicationId, draft: EventDraft) -> Result<(), StoreError> {
        match self {
            Self::Guest(store) => store.add_event(id, draft),
            Self::Account(store) => store.add_event(id, draft),
        }
    }

    fn list_events(&mut self, id: &ApplicationId) -> Result<Vec<ApplicationEvent>, StoreError> {
        match self {
            Self::Guest(store) => store.list_events(id),
            Self::Account(store) => store.list_events(id),
        }
    }

    fn add_contact(&mut self, id: &ApplicationId, draft: ContactDraft) -> Result<(), StoreError> {
        match self {
            Self::Guest(store) => store.add_contact(id, draft),
            Self::Account(store) => store.add_contact(id, draft),
        }
    }

    fn list_contacts(&mut self, id: &ApplicationId) -> Result<Vec<Contact>, StoreError> {
        match self {
            Self::Guest(store) => store.list_contacts(id),
            Self::Account(store) => store.list_contacts(id),
        }
    }

    fn add_reminder(
        &mut self,
        id: &ApplicationId,
        draft: ReminderDraft,
    ) -> Result<(), StoreError> {
        match self {
            Self::Guest(store) => store.add_reminder(id, draft),
            Self::Account(store) => store.add_reminder(id, draft),
        }
    }

    fn get_settings(&mut self) -> Result<Settings, StoreError> {
        match self {
            Self::Guest(store) => store.get_settings(),
            Self::Account(store) => store.get_settings(),
        }
    }

    fn update_settings(&mut self, patch: SettingsPatch) -> Result<Settings, StoreError> {
        match self {
            Self::Guest(store) => store.update_settings(patch),
            Self::Account(store) => store.update_settings(patch),
        }
    }

    fn get_progress(&mut self) -> Result<UserProgress, StoreError> {
        match self {
            Self::Guest(store) => store.get_progress(),
            Self::Account(store) => store.get_progress(),
        }
    }

    fn import_application(&mut self, row: &CsvRow) -> Result<ApplicationId, StoreError> {
        match self {
            Self::Guest(store) => store.import_application(row),
            Self::Account(store) => store.import_application(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ScopedStore, open_scoped};
    use crate::cache::CachedStore;
    use crate::error::StoreError;
    use crate::local::LocalStore;
    use crate::remote::{MemoryTransport, RemoteStore};
    use crate::scope::Scope;
    use crate::store::Store;
    use huntboard_core::config::AppConfig;
    use huntboard_core::model::application::{ApplicationDraft, ApplicationId};

    #[test]
    fn guest_scope_routes_to_local_ids() {
        let local = LocalStore::open_in_memory().expect("store");
        let mut store: ScopedStore<MemoryTransport> = ScopedStore::guest(local);
        let id = store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");
        assert!(matches!(id, ApplicationId::Local(_)));
    }

    #[test]
    fn account_scope_routes_to_remote_ids() {
        let cached = CachedStore::new(RemoteStore::new(MemoryTransport::new()));
        let mut store = ScopedStore::account(cached);
        let id = store
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");
        assert!(matches!(id, ApplicationId::Remote(_)));
    }

    #[test]
    fn signed_in_without_token_is_auth_required() {
        let mut config = AppConfig::default();
        config.remote.base_url = Some("https://api.example.test".to_string());
        let err = open_scoped(&config, &Scope::Account("u_1".to_string()));
        assert!(matches!(err, Err(StoreError::AuthRequired)));
    }

    #[test]
    fn signed_in_without_base_url_is_a_transport_error() {
        let config = AppConfig::default();
        let err = open_scoped(&config, &Scope::Account("u_1".to_string()));
        assert!(matches!(err, Err(StoreError::Remote(_))));
    }
}
