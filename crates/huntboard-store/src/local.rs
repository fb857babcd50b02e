//! Guest-scope backend: a SQLite table set on device.
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` to allow concurrent readers while a writer appends
//! - `busy_timeout = 5s` to reduce transient lock failures under contention
//! - `foreign_keys = ON` so owned rows cannot outlive their application
//!
//! Settings and progress are singleton rows stored as JSON; the meta table
//! holds the schema version, migration markers, and guest UI preferences.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use huntboard_core::csv::CsvRow;
use huntboard_core::model::application::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, Platform, Priority, Status,
};
use huntboard_core::model::contact::{Contact, ContactDraft};
use huntboard_core::model::event::{ApplicationEvent, EventDraft, EventKind};
use huntboard_core::model::progress::UserProgress;
use huntboard_core::model::reminder::ReminderDraft;
use huntboard_core::model::settings::{Settings, SettingsPatch};

use crate::activity::{WriteAction, apply_activity};
use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::migrate::MigrationBundle;
use crate::store::Store;

/// Busy timeout used for local store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const LATEST_SCHEMA_VERSION: i64 = 1;
const MIGRATION_MARKER_PREFIX: &str = "migrated:";
const UI_PREF_PREFIX: &str = "pref:";

pub struct LocalStore {
    conn: Connection,
    clock: Box<dyn Clock>,
}

impl LocalStore {
    /// Open (or create) the local database file, apply runtime pragmas,
    /// and migrate the schema to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if opening/configuring/migrating the database
    /// fails.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Corrupt {
                field: "data_dir",
                reason: e.to_string(),
            })?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests and ephemeral sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if schema setup fails.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        configure_connection(&conn)?;
        migrate_schema(&conn)?;
        Ok(Self {
            conn,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the time source (tests).
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // --- migration support -------------------------------------------------

    /// Whether the one-shot guest-data migration already ran for this
    /// identity on this device.
    ///
    /// # Errors
    ///
    /// SQLite failure.
    pub fn migration_marker(&self, identity: &str) -> Result<bool, StoreError> {
        let key = format!("{MIGRATION_MARKER_PREFIX}{identity}");
        let found: Option<String> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = ?1", [&key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    /// Record that migration completed for this identity.
    ///
    /// # Errors
    ///
    /// SQLite failure.
    pub fn set_migration_marker(&self, identity: &str) -> Result<(), StoreError> {
        let key = format!("{MIGRATION_MARKER_PREFIX}{identity}");
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![key, self.now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Number of applications in the guest scope.
    ///
    /// # Errors
    ///
    /// SQLite failure.
    pub fn count_applications(&self) -> Result<u32, StoreError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Every application with its owned records, stripped to drafts for
    /// the bulk transfer. Local ids and timestamps do not travel.
    ///
    /// # Errors
    ///
    /// SQLite failure or a corrupt stored row.
    pub fn export_bundles(&mut self) -> Result<Vec<MigrationBundle>, StoreError> {
        let apps = self.list_applications()?;
        let mut bundles = Vec::with_capacity(apps.len());
        for app in apps {
            let events = self
                .list_events(&app.id)?
                .into_iter()
                .map(|event| EventDraft {
                    kind: event.kind,
                    title: event.title,
                    description: event.description,
                    event_date: event.event_date,
                    completed: event.completed,
                    scheduled_at: event.scheduled_at,
                })
                .collect();
            let contacts = self
                .list_contacts(&app.id)?
                .into_iter()
                .map(|contact| ContactDraft {
                    name: contact.name,
                    role: contact.role,
                    email: contact.email,
                    phone: contact.phone,
                    linkedin: contact.linkedin,
                    notes: contact.notes,
                })
                .collect();
            let reminders = self.list_reminder_drafts(&app.id)?;

            bundles.push(MigrationBundle {
                application: ApplicationDraft {
                    company: app.company,
                    role: app.role,
                    location: app.location,
                    salary: app.salary,
                    url: app.url,
                    platform: app.platform,
                    status: app.status,
                    priority: app.priority,
                    notes: app.notes,
                },
                events,
                contacts,
                reminders,
            });
        }
        Ok(bundles)
    }

    /// Wipe every guest table and guest UI preference after a successful
    /// migration. Migration markers survive so the transfer stays
    /// at-most-once on this device.
    ///
    /// # Errors
    ///
    /// SQLite failure.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM events", [])?;
        tx.execute("DELETE FROM contacts", [])?;
        tx.execute("DELETE FROM reminders", [])?;
        tx.execute("DELETE FROM applications", [])?;
        tx.execute("DELETE FROM settings", [])?;
        tx.execute("DELETE FROM progress", [])?;
        tx.execute(
            "DELETE FROM meta WHERE key LIKE ?1",
            [format!("{UI_PREF_PREFIX}%")],
        )?;
        tx.commit()?;
        debug!("cleared guest tables");
        Ok(())
    }

    /// Set a guest-only UI preference flag.
    ///
    /// # Errors
    ///
    /// SQLite failure.
    pub fn set_ui_pref(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![format!("{UI_PREF_PREFIX}{key}"), value],
        )?;
        Ok(())
    }

    /// Read a guest-only UI preference flag.
    ///
    /// # Errors
    ///
    /// SQLite failure.
    pub fn ui_pref(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                [format!("{UI_PREF_PREFIX}{key}")],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    // --- internals ---------------------------------------------------------

    fn local_id(id: &ApplicationId) -> Option<i64> {
        match id {
            ApplicationId::Local(raw) => Some(*raw),
            ApplicationId::Remote(_) => None,
        }
    }

    fn require_app(&self, id: &ApplicationId) -> Result<(i64, Application), StoreError> {
        let raw = Self::local_id(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let app = self
            .fetch_application(raw)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok((raw, app))
    }

    fn fetch_application(&self, raw: i64) -> Result<Option<Application>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, company, role, location, salary, url, platform, status, priority,
                        archived, notes, created_at, updated_at, applied_at, last_touch_at
                 FROM applications WHERE id = ?1",
                [raw],
                row_to_application,
            )
            .optional()
            .map_err(StoreError::from)
    }

    fn insert_application(
        &mut self,
        draft: &ApplicationDraft,
        applied_at: Option<DateTime<Utc>>,
        last_touch_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO applications
                (company, role, location, salary, url, platform, status, priority,
                 archived, notes, created_at, updated_at, applied_at, last_touch_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10, ?11, ?12, ?13)",
            params![
                draft.company,
                draft.role,
                draft.location,
                draft.salary,
                draft.url,
                draft.platform.to_string(),
                draft.status.to_string(),
                draft.priority.map(|p| p.to_string()),
                draft.notes,
                now.to_rfc3339(),
                now.to_rfc3339(),
                applied_at.map(|d| d.to_rfc3339()),
                last_touch_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_event(&self, raw: i64, draft: &EventDraft, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO events
                (application_id, kind, title, description, event_date, created_at,
                 completed, scheduled_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                raw,
                draft.kind.to_string(),
                draft.title,
                draft.description,
                draft.event_date.to_rfc3339(),
                now.to_rfc3339(),
                i64::from(draft.completed),
                draft.scheduled_at.map(|d| d.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    fn touch(&self, raw: i64, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE applications SET updated_at = ?1, last_touch_at = ?1 WHERE id = ?2",
            params![now.to_rfc3339(), raw],
        )?;
        Ok(())
    }

    fn record_activity(&self, action: WriteAction) -> Result<(), StoreError> {
        let settings = read_settings(&self.conn)?;
        let mut progress = read_progress(&self.conn)?;
        apply_activity(
            &mut progress,
            &settings,
            action,
            self.now().date_naive(),
        );
        write_progress(&self.conn, &progress)
    }

    fn list_reminder_drafts(&self, id: &ApplicationId) -> Result<Vec<ReminderDraft>, StoreError> {
        let Some(raw) = Self::local_id(id) else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare(
            "SELECT title, due_at FROM reminders WHERE application_id = ?1 ORDER BY due_at",
        )?;
        let rows = stmt.query_map([raw], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut drafts = Vec::new();
        for row in rows {
            let (title, due_at) = row?;
            drafts.push(ReminderDraft {
                title,
                due_at: parse_ts("reminders.due_at", &due_at)?,
            });
        }
        Ok(drafts)
    }
}

impl Store for LocalStore {
    fn list_applications(&mut self) -> Result<Vec<Application>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company, role, location, salary, url, platform, status, priority,
                    archived, notes, created_at, updated_at, applied_at, last_touch_at
             FROM applications ORDER BY updated_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], row_to_application)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    fn get_application(
        &mut self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, StoreError> {
        match Self::local_id(id) {
            Some(raw) => self.fetch_application(raw),
            None => Ok(None),
        }
    }

    fn create_application(
        &mut self,
        draft: ApplicationDraft,
    ) -> Result<ApplicationId, StoreError> {
        let now = self.now();
        let applied_at = (draft.status != Status::Saved).then_some(now);
        let raw = self.insert_application(&draft, applied_at, now, now)?;

        self.insert_event(
            raw,
            &EventDraft::new(EventKind::StatusChange, "Application created", now),
            now,
        )?;
        self.record_activity(WriteAction::Created {
            initial_status: draft.status,
        })?;

        debug!(id = raw, company = %draft.company, "created application");
        Ok(ApplicationId::Local(raw))
    }

    fn update_status(&mut self, id: &ApplicationId, status: Status) -> Result<(), StoreError> {
        let (raw, app) = self.require_app(id)?;
        let now = self.now();

        // First departure from `saved` stamps applied_at; it is never
        // overwritten afterwards.
        let stamp_applied =
            app.status == Status::Saved && status != Status::Saved && app.applied_at.is_none();
        if stamp_applied {
            self.conn.execute(
                "UPDATE applications
                 SET status = ?1, updated_at = ?2, last_touch_at = ?2, applied_at = ?2
                 WHERE id = ?3",
                params![status.to_string(), now.to_rfc3339(), raw],
            )?;
        } else {
            self.conn.execute(
                "UPDATE applications
                 SET status = ?1, updated_at = ?2, last_touch_at = ?2
                 WHERE id = ?3",
                params![status.to_string(), now.to_rfc3339(), raw],
            )?;
        }

        let mut event = EventDraft::new(
            EventKind::StatusChange,
            format!("Status changed to {status}"),
            now,
        );
        event.description = Some(format!("from {} to {status}", app.status));
        self.insert_event(raw, &event, now)?;

        self.record_activity(WriteAction::StatusChanged {
            from: app.status,
            to: status,
        })?;

        debug!(id = raw, from = %app.status, to = %status, "status transition");
        Ok(())
    }

    fn update_application(
        &mut self,
        id: &ApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<(), StoreError> {
        let (raw, mut app) = self.require_app(id)?;
        let now = self.now();
        patch.apply_to(&mut app);

        self.conn.execute(
            "UPDATE applications
             SET company = ?1, role = ?2, location = ?3, salary = ?4, url = ?5,
                 platform = ?6, priority = ?7, archived = ?8, notes = ?9,
                 updated_at = ?10, last_touch_at = ?10
             WHERE id = ?11",
            params![
                app.company,
                app.role,
                app.location,
                app.salary,
                app.url,
                app.platform.to_string(),
                app.priority.map(|p| p.to_string()),
                i64::from(app.archived),
                app.notes,
                now.to_rfc3339(),
                raw,
            ],
        )?;
        Ok(())
    }

    fn delete_application(&mut self, id: &ApplicationId) -> Result<(), StoreError> {
        let raw = Self::local_id(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        // Explicit cascade: owned rows first, inside one transaction.
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM events WHERE application_id = ?1", [raw])?;
        tx.execute("DELETE FROM contacts WHERE application_id = ?1", [raw])?;
        tx.execute("DELETE FROM reminders WHERE application_id = ?1", [raw])?;
        let deleted = tx.execute("DELETE FROM applications WHERE id = ?1", [raw])?;
        tx.commit()?;

        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        debug!(id = raw, "deleted application");
        Ok(())
    }

    fn add_event(&mut self, id: &ApplicationId, draft: EventDraft) -> Result<(), StoreError> {
        let (raw, _) = self.require_app(id)?;
        let now = self.now();
        self.insert_event(raw, &draft, now)?;

        // A follow-up is a meaningful interaction with the application
        // itself; other event kinds leave the parent untouched.
        if draft.kind == EventKind::FollowUp {
            self.touch(raw, now)?;
        }
        self.record_activity(WriteAction::EventAdded { kind: draft.kind })
    }

    fn list_events(&mut self, id: &ApplicationId) -> Result<Vec<ApplicationEvent>, StoreError> {
        let Some(raw) = Self::local_id(id) else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, title, description, event_date, created_at, completed, scheduled_at
             FROM events WHERE application_id = ?1 ORDER BY event_date DESC, id DESC",
        )?;
        let rows = stmt.query_map([raw], row_to_event)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    fn add_contact(&mut self, id: &ApplicationId, draft: ContactDraft) -> Result<(), StoreError> {
        let (raw, _) = self.require_app(id)?;
        let now = self.now();
        self.conn.execute(
            "INSERT INTO contacts
                (application_id, name, role, email, phone, linkedin, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                raw,
                draft.name,
                draft.role,
                draft.email,
                draft.phone,
                draft.linkedin,
                draft.notes,
                now.to_rfc3339(),
            ],
        )?;
        self.record_activity(WriteAction::ContactAdded)
    }

    fn list_contacts(&mut self, id: &ApplicationId) -> Result<Vec<Contact>, StoreError> {
        let Some(raw) = Self::local_id(id) else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare(
            "SELECT id, name, role, email, phone, linkedin, notes, created_at
             FROM contacts WHERE application_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([raw], row_to_contact)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    fn add_reminder(
        &mut self,
        id: &ApplicationId,
        draft: ReminderDraft,
    ) -> Result<(), StoreError> {
        let (raw, _) = self.require_app(id)?;
        let now = self.now();
        self.conn.execute(
            "INSERT INTO reminders (application_id, title, due_at, done, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![raw, draft.title, draft.due_at.to_rfc3339(), now.to_rfc3339()],
        )?;
        Ok(())
    }

    fn get_settings(&mut self) -> Result<Settings, StoreError> {
        read_settings(&self.conn)
    }

    fn update_settings(&mut self, patch: SettingsPatch) -> Result<Settings, StoreError> {
        let mut settings = read_settings(&self.conn)?;
        patch.apply_to(&mut settings);
        write_settings(&self.conn, &settings)?;
        Ok(settings)
    }

    fn get_progress(&mut self) -> Result<UserProgress, StoreError> {
        read_progress(&self.conn)
    }

    fn import_application(&mut self, row: &CsvRow) -> Result<ApplicationId, StoreError> {
        let now = self.now();
        // The file's applied date wins; otherwise fall back to the create
        // rule (stamp iff the imported status already left `saved`).
        let applied_at = row
            .applied_at
            .or_else(|| (row.draft.status != Status::Saved).then_some(now));
        let raw = self.insert_application(&row.draft, applied_at, row.last_touch_at, now)?;
        self.record_activity(WriteAction::Created {
            initial_status: row.draft.status,
        })?;
        Ok(ApplicationId::Local(raw))
    }
}

// --- connection setup ------------------------------------------------------

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

fn migrate_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS meta (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
        [],
    )?;

    let version: i64 = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0);

    if version >= LATEST_SCHEMA_VERSION {
        return Ok(());
    }

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS applications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company TEXT NOT NULL,
            role TEXT NOT NULL,
            location TEXT,
            salary TEXT,
            url TEXT,
            platform TEXT NOT NULL DEFAULT 'other',
            status TEXT NOT NULL DEFAULT 'saved'
                CHECK (status IN ('saved', 'applied', 'screen', 'interview1',
                                  'interview2', 'final', 'offer', 'rejected', 'ghosted')),
            priority TEXT CHECK (priority IN ('low', 'medium', 'high')),
            archived INTEGER NOT NULL DEFAULT 0,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            applied_at TEXT,
            last_touch_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
            kind TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            event_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            scheduled_at TEXT
        );

        CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            role TEXT,
            email TEXT,
            phone TEXT,
            linkedin TEXT,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reminders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            due_at TEXT NOT NULL,
            done INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS progress (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            json TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_applications_updated ON applications(updated_at DESC);
        CREATE INDEX IF NOT EXISTS idx_events_application ON events(application_id);
        CREATE INDEX IF NOT EXISTS idx_contacts_application ON contacts(application_id);
        CREATE INDEX IF NOT EXISTS idx_reminders_application ON reminders(application_id);",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [LATEST_SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

// --- singleton rows --------------------------------------------------------

fn read_settings(conn: &Connection) -> Result<Settings, StoreError> {
    let json: Option<String> = conn
        .query_row("SELECT json FROM settings WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    match json {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            field: "settings",
            reason: e.to_string(),
        }),
        None => Ok(Settings::default()),
    }
}

fn write_settings(conn: &Connection, settings: &Settings) -> Result<(), StoreError> {
    let json = serde_json::to_string(settings).map_err(|e| StoreError::Corrupt {
        field: "settings",
        reason: e.to_string(),
    })?;
    conn.execute(
        "INSERT OR REPLACE INTO settings (id, json) VALUES (1, ?1)",
        [json],
    )?;
    Ok(())
}

fn read_progress(conn: &Connection) -> Result<UserProgress, StoreError> {
    let json: Option<String> = conn
        .query_row("SELECT json FROM progress WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    match json {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            field: "progress",
            reason: e.to_string(),
        }),
        None => Ok(UserProgress::new()),
    }
}

fn write_progress(conn: &Connection, progress: &UserProgress) -> Result<(), StoreError> {
    let json = serde_json::to_string(progress).map_err(|e| StoreError::Corrupt {
        field: "progress",
        reason: e.to_string(),
    })?;
    conn.execute(
        "INSERT OR REPLACE INTO progress (id, json) VALUES (1, ?1)",
        [json],
    )?;
    Ok(())
}

// --- row mapping -----------------------------------------------------------

fn parse_ts(field: &'static str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            field,
            reason: e.to_string(),
        })
}

fn column_ts(raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn column_enum<T: std::str::FromStr>(raw: &str, fallback: T) -> T {
    raw.parse().unwrap_or(fallback)
}

fn row_to_application(row: &Row<'_>) -> rusqlite::Result<Application> {
    let platform: String = row.get(6)?;
    let status: String = row.get(7)?;
    let priority: Option<String> = row.get(8)?;
    let applied_at: Option<String> = row.get(13)?;

    Ok(Application {
        id: ApplicationId::Local(row.get(0)?),
        company: row.get(1)?,
        role: row.get(2)?,
        location: row.get(3)?,
        salary: row.get(4)?,
        url: row.get(5)?,
        platform: column_enum(&platform, Platform::Other),
        status: column_enum(&status, Status::Saved),
        priority: priority.map(|p| column_enum(&p, Priority::Medium)),
        archived: row.get::<_, i64>(9)? != 0,
        notes: row.get(10)?,
        created_at: column_ts(row.get(11)?)?,
        updated_at: column_ts(row.get(12)?)?,
        applied_at: applied_at.map(column_ts).transpose()?,
        last_touch_at: column_ts(row.get(14)?)?,
    })
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<ApplicationEvent> {
    let kind: String = row.get(1)?;
    let scheduled_at: Option<String> = row.get(7)?;
    Ok(ApplicationEvent {
        id: row.get(0)?,
        kind: column_enum(&kind, EventKind::Note),
        title: row.get(2)?,
        description: row.get(3)?,
        event_date: column_ts(row.get(4)?)?,
        created_at: column_ts(row.get(5)?)?,
        completed: row.get::<_, i64>(6)? != 0,
        scheduled_at: scheduled_at.map(column_ts).transpose()?,
    })
}

fn row_to_contact(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        role: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        linkedin: row.get(5)?,
        notes: row.get(6)?,
        created_at: column_ts(row.get(7)?)?,
    })
}
