//! Command handlers. Each module owns one subcommand: its clap args, its
//! store calls, and its human rendering.

pub mod add;
pub mod advance;
pub mod contact;
pub mod delete;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod migrate;
pub mod next;
pub mod progress;
pub mod remind;
pub mod settings;
pub mod show;
pub mod stats;

use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use huntboard_core::model::application::{Application, ApplicationId};
use huntboard_store::{Store, StoreError};

use crate::output::{CliError, OutputMode, render_error};

/// Parse a date argument: `YYYY-MM-DD` (midnight UTC) or full RFC 3339.
pub fn parse_date(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(date) = raw.parse::<NaiveDate>() {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("invalid date: {raw}"))?;
        return Ok(midnight.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("invalid date: {raw} (expected YYYY-MM-DD or RFC 3339)"))
}

/// Parse an application id argument (numeric for guest, opaque for
/// account ids).
pub fn parse_id(raw: &str) -> ApplicationId {
    raw.parse().unwrap_or_else(|_| ApplicationId::Remote(raw.to_string()))
}

/// Fetch an application or report not-found and bail.
pub fn require_application(
    store: &mut dyn Store,
    raw: &str,
    output: OutputMode,
) -> anyhow::Result<Application> {
    let id = parse_id(raw);
    match store.get_application(&id)? {
        Some(app) => Ok(app),
        None => {
            render_error(
                output,
                &CliError::new(format!("application not found: {raw}"), "not_found"),
            )?;
            Err(anyhow!("application not found: {raw}"))
        }
    }
}

/// Report a store failure at the action boundary.
pub fn report_store_error(output: OutputMode, err: &StoreError) -> anyhow::Result<()> {
    let code = match err {
        StoreError::NotFound(_) => "not_found",
        StoreError::AuthRequired => "auth_required",
        StoreError::Remote(_) => "remote_unavailable",
        _ => "store_error",
    };
    render_error(output, &CliError::new(err.to_string(), code))
}
