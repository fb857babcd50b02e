//! One-shot transfer of guest data into a signed-in identity's partition.
//!
//! The transfer runs at most once per identity per device. A marker row in
//! the local meta table records completion; it is written only after the
//! remote bulk insert succeeds and survives the local wipe, so a failed
//! attempt leaves everything in place for a retry and a completed one can
//! never run again.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use huntboard_core::model::application::ApplicationDraft;
use huntboard_core::model::contact::ContactDraft;
use huntboard_core::model::event::EventDraft;
use huntboard_core::model::reminder::ReminderDraft;

use crate::error::StoreError;
use crate::local::LocalStore;
use crate::remote::api::RemoteTransport;

/// One application with its owned records, stripped of local ids and
/// timestamps. The receiving side stamps and assigns ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationBundle {
    pub application: ApplicationDraft,
    #[serde(default)]
    pub events: Vec<EventDraft>,
    #[serde(default)]
    pub contacts: Vec<ContactDraft>,
    #[serde(default)]
    pub reminders: Vec<ReminderDraft>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    /// Applications transferred.
    pub migrated: u32,
    /// True when the marker showed a previous completed run.
    pub skipped: bool,
}

/// Move all guest data to the remote partition for `identity`.
///
/// Order matters: bulk insert first, then marker, then local wipe. The
/// remote call is atomic, so a failure there changes nothing on either
/// side.
///
/// # Errors
///
/// [`StoreError::Migration`] when the remote bulk insert fails; local
/// SQLite errors otherwise.
pub fn migrate_guest_data<T: RemoteTransport>(
    local: &mut LocalStore,
    transport: &mut T,
    identity: &str,
) -> Result<MigrationReport, StoreError> {
    if local.migration_marker(identity)? {
        info!(identity, "migration already completed on this device");
        return Ok(MigrationReport {
            migrated: 0,
            skipped: true,
        });
    }

    let count = local.count_applications()?;
    if count == 0 {
        local.set_migration_marker(identity)?;
        info!(identity, "no guest data to migrate");
        return Ok(MigrationReport {
            migrated: 0,
            skipped: false,
        });
    }

    let bundles = local.export_bundles()?;
    let migrated = match transport.bulk_create(&bundles) {
        Ok(created) => created,
        Err(err) => {
            warn!(identity, error = %err, "bulk insert failed, guest data untouched");
            return Err(StoreError::Migration(err.to_string()));
        }
    };

    local.set_migration_marker(identity)?;
    local.clear_all()?;
    info!(identity, migrated, "guest data migrated");
    Ok(MigrationReport {
        migrated,
        skipped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::migrate_guest_data;
    use crate::local::LocalStore;
    use crate::remote::api::RemoteTransport;
    use crate::remote::memory::MemoryTransport;
    use crate::store::Store;
    use huntboard_core::model::application::{ApplicationDraft, Status};
    use huntboard_core::model::contact::ContactDraft;

    fn guest_with_data() -> LocalStore {
        let mut local = LocalStore::open_in_memory().expect("store");
        let id = local
            .create_application(ApplicationDraft::new("Stripe", "SWE"))
            .expect("create");
        local.update_status(&id, Status::Applied).expect("apply");
        local
            .add_contact(&id, ContactDraft::new("Ana"))
            .expect("contact");
        let mut second = ApplicationDraft::new("Figma", "PM");
        second.status = Status::Screen;
        local.create_application(second).expect("create");
        local
    }

    #[test]
    fn migrates_once_then_skips() {
        let mut local = guest_with_data();
        let mut transport = MemoryTransport::new();

        let report = migrate_guest_data(&mut local, &mut transport, "u_1").expect("migrate");
        assert_eq!(report.migrated, 2);
        assert!(!report.skipped);
        assert_eq!(transport.list_applications().expect("list").len(), 2);

        // Guest tables are empty, marker is set.
        assert!(local.list_applications().expect("list").is_empty());
        let again = migrate_guest_data(&mut local, &mut transport, "u_1").expect("again");
        assert!(again.skipped);
        assert_eq!(transport.list_applications().expect("list").len(), 2);
    }

    #[test]
    fn empty_guest_scope_marks_without_transfer() {
        let mut local = LocalStore::open_in_memory().expect("store");
        let mut transport = MemoryTransport::new();

        let report = migrate_guest_data(&mut local, &mut transport, "u_1").expect("migrate");
        assert_eq!(report.migrated, 0);
        assert!(!report.skipped);
        assert!(local.migration_marker("u_1").expect("marker"));
    }

    #[test]
    fn failed_bulk_insert_leaves_guest_data_for_retry() {
        let mut local = guest_with_data();
        let mut transport = MemoryTransport::new();
        transport.fail_writes = true;

        assert!(migrate_guest_data(&mut local, &mut transport, "u_1").is_err());
        assert!(!local.migration_marker("u_1").expect("marker"));
        assert_eq!(local.list_applications().expect("list").len(), 2);

        // Retry succeeds once the remote recovers.
        transport.fail_writes = false;
        let report = migrate_guest_data(&mut local, &mut transport, "u_1").expect("retry");
        assert_eq!(report.migrated, 2);
    }

    #[test]
    fn marker_is_per_identity() {
        let mut local = guest_with_data();
        let mut transport_a = MemoryTransport::new();
        migrate_guest_data(&mut local, &mut transport_a, "u_1").expect("first");

        // A different identity on the same device gets its own run; the
        // guest scope is empty now, so nothing transfers.
        let mut transport_b = MemoryTransport::new();
        let report = migrate_guest_data(&mut local, &mut transport_b, "u_2").expect("second");
        assert_eq!(report.migrated, 0);
        assert!(!report.skipped);
    }

    #[test]
    fn owned_records_travel_with_their_application() {
        let mut local = guest_with_data();
        let bundles = local.export_bundles().expect("bundles");
        let stripe = bundles
            .iter()
            .find(|b| b.application.company == "Stripe")
            .expect("bundle");
        assert_eq!(stripe.contacts.len(), 1);
        // Creation event plus the transition to applied.
        assert_eq!(stripe.events.len(), 2);
    }
}
