//! `hb move` — pipeline status transitions.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use huntboard_core::model::application::{ApplicationId, Status};
use huntboard_store::Store;

use crate::cmd::require_application;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Application id.
    pub id: String,

    /// Target status (saved, applied, screen, interview1, interview2,
    /// final, offer, rejected, ghosted).
    pub status: String,
}

#[derive(Debug, Serialize)]
struct MoveReport {
    id: ApplicationId,
    from: Status,
    to: Status,
    applied_at_stamped: bool,
}

/// Execute `hb move`.
pub fn run_move(args: &MoveArgs, output: OutputMode, store: &mut dyn Store) -> anyhow::Result<()> {
    let to: Status = args.status.parse()?;
    let before = require_application(store, &args.id, output)?;

    store.update_status(&before.id, to)?;
    let after = store.get_application(&before.id)?;

    let report = MoveReport {
        id: before.id,
        from: before.status,
        to,
        applied_at_stamped: before.applied_at.is_none()
            && after.is_some_and(|app| app.applied_at.is_some()),
    };

    render(output, &report, |report, w| {
        writeln!(w, "{}: {} -> {}", report.id, report.from, report.to)?;
        if report.applied_at_stamped {
            writeln!(w, "applied date recorded")?;
        }
        Ok(())
    })
}
