//! Domain model: applications, their owned records, and the two per-scope
//! singletons (settings, progress).

pub mod application;
pub mod contact;
pub mod event;
pub mod progress;
pub mod reminder;
pub mod settings;

pub use application::{
    Application, ApplicationDraft, ApplicationId, ApplicationPatch, PIPELINE_ORDER, ParseEnumError,
    Platform, Priority, Status,
};
pub use contact::{Contact, ContactDraft};
pub use event::{ApplicationEvent, EventDraft, EventKind};
pub use progress::{UserProgress, WeeklyStat, badges};
pub use reminder::{Reminder, ReminderDraft};
pub use settings::{MAX_STREAK_GRACE_DAYS, Settings, SettingsPatch};
