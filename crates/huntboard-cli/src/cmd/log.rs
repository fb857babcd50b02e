//! `hb log` — append a timeline event.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use chrono::Utc;
use huntboard_core::model::event::{EventDraft, EventKind};
use huntboard_store::Store;

use crate::cmd::{parse_date, require_application};
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Application id.
    pub id: String,

    /// Event kind (applied, phone-screen, technical, take-home, onsite,
    /// offer, rejection, follow-up, note).
    pub kind: String,

    /// Short title for the timeline.
    pub title: String,

    /// When it happened (defaults to now).
    #[arg(long)]
    pub date: Option<String>,

    /// Longer description.
    #[arg(long)]
    pub note: Option<String>,

    /// A future date this event is scheduled for.
    #[arg(long)]
    pub scheduled: Option<String>,
}

#[derive(Debug, Serialize)]
struct LogReport {
    kind: EventKind,
    title: String,
}

/// Execute `hb log`.
pub fn run_log(args: &LogArgs, output: OutputMode, store: &mut dyn Store) -> anyhow::Result<()> {
    let kind: EventKind = args.kind.parse()?;
    let app = require_application(store, &args.id, output)?;

    let event_date = match &args.date {
        Some(raw) => parse_date(raw)?,
        None => Utc::now(),
    };
    let mut draft = EventDraft::new(kind, &args.title, event_date);
    draft.description = args.note.clone();
    draft.scheduled_at = args.scheduled.as_deref().map(parse_date).transpose()?;

    store.add_event(&app.id, draft)?;

    let report = LogReport {
        kind,
        title: args.title.clone(),
    };
    render(output, &report, |report, w| {
        writeln!(w, "Logged {} \"{}\"", report.kind, report.title)
    })
}
