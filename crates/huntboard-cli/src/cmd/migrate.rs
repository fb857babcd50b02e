//! `hb migrate` — one-shot transfer of guest data to a signed-in account.

use anyhow::bail;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use huntboard_core::config::AppConfig;
use huntboard_store::dispatch::LOCAL_DB_FILE;
use huntboard_store::migrate::migrate_guest_data;
use huntboard_store::remote::HttpTransport;
use huntboard_store::{LocalStore, StoreError};

use crate::output::{CliError, OutputMode, render, render_error};

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// The identity key to migrate guest data into.
    #[arg(long)]
    pub identity: String,
}

#[derive(Debug, Serialize)]
struct MigrateReport {
    migrated: u32,
    skipped: bool,
}

/// Execute `hb migrate`.
pub fn run_migrate(
    args: &MigrateArgs,
    output: OutputMode,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let Some(base_url) = config.remote.base_url.as_deref() else {
        render_error(
            output,
            &CliError::with_details(
                "remote backend not configured",
                "set remote.base_url in config.toml",
                "remote_unconfigured",
            ),
        )?;
        bail!("remote backend not configured");
    };
    let Some(token) = config.remote.api_token.as_deref() else {
        render_error(
            output,
            &CliError::new(StoreError::AuthRequired.to_string(), "auth_required"),
        )?;
        bail!("missing api token");
    };

    let mut local = LocalStore::open(&config.resolve_data_dir().join(LOCAL_DB_FILE))?;
    let mut transport = HttpTransport::new(base_url, token)?;
    let report = migrate_guest_data(&mut local, &mut transport, &args.identity)?;

    let report = MigrateReport {
        migrated: report.migrated,
        skipped: report.skipped,
    };
    render(output, &report, |report, w| {
        if report.skipped {
            writeln!(w, "Already migrated on this device; nothing to do.")
        } else {
            writeln!(w, "Migrated {} application(s) to your account.", report.migrated)
        }
    })
}
