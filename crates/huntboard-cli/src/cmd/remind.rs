//! `hb remind` — attach a dated to-do.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use chrono::{DateTime, Utc};
use huntboard_core::model::reminder::ReminderDraft;
use huntboard_store::Store;

use crate::cmd::{parse_date, require_application};
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct RemindArgs {
    /// Application id.
    pub id: String,

    /// What to do.
    pub title: String,

    /// When it is due (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub due: String,
}

#[derive(Debug, Serialize)]
struct RemindReport {
    title: String,
    due_at: DateTime<Utc>,
}

/// Execute `hb remind`.
pub fn run_remind(
    args: &RemindArgs,
    output: OutputMode,
    store: &mut dyn Store,
) -> anyhow::Result<()> {
    let due_at = parse_date(&args.due)?;
    let app = require_application(store, &args.id, output)?;
    store.add_reminder(&app.id, ReminderDraft::new(&args.title, due_at))?;

    let report = RemindReport {
        title: args.title.clone(),
        due_at,
    };
    render(output, &report, |report, w| {
        writeln!(
            w,
            "Reminder \"{}\" due {}",
            report.title,
            report.due_at.format("%Y-%m-%d")
        )
    })
}
