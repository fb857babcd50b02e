//! `hb delete` — remove an application and everything attached to it.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use huntboard_core::model::application::ApplicationId;
use huntboard_store::Store;

use crate::cmd::require_application;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Application id.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct DeleteReport {
    id: ApplicationId,
    company: String,
}

/// Execute `hb delete`.
pub fn run_delete(
    args: &DeleteArgs,
    output: OutputMode,
    store: &mut dyn Store,
) -> anyhow::Result<()> {
    let app = require_application(store, &args.id, output)?;
    store.delete_application(&app.id)?;

    let report = DeleteReport {
        id: app.id,
        company: app.company,
    };
    render(output, &report, |report, w| {
        writeln!(w, "Deleted {} ({})", report.id, report.company)
    })
}
