//! `hb add` — track a new application.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use huntboard_core::model::application::{Application, ApplicationDraft, ApplicationId};
use huntboard_store::Store;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Company name.
    pub company: String,

    /// Role title.
    pub role: String,

    #[arg(long)]
    pub location: Option<String>,

    /// Salary range, free text.
    #[arg(long)]
    pub salary: Option<String>,

    /// Posting URL.
    #[arg(long)]
    pub url: Option<String>,

    /// Where the posting was found (linkedin, indeed, referral, ...).
    #[arg(long)]
    pub platform: Option<String>,

    /// Initial pipeline status (defaults to saved).
    #[arg(long)]
    pub status: Option<String>,

    /// low, medium, or high.
    #[arg(long)]
    pub priority: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddReport {
    id: ApplicationId,
    company: String,
    role: String,
    status: String,
}

/// Execute `hb add`.
pub fn run_add(args: &AddArgs, output: OutputMode, store: &mut dyn Store) -> anyhow::Result<()> {
    let mut draft = ApplicationDraft::new(&args.company, &args.role);
    draft.location = args.location.clone();
    draft.salary = args.salary.clone();
    draft.url = args.url.clone();
    draft.notes = args.notes.clone();
    if let Some(platform) = &args.platform {
        draft.platform = platform.parse()?;
    }
    if let Some(status) = &args.status {
        draft.status = status.parse()?;
    }
    if let Some(priority) = &args.priority {
        draft.priority = Some(priority.parse()?);
    }

    let status = draft.status;
    let id = store.create_application(draft)?;
    let report = AddReport {
        id,
        company: args.company.clone(),
        role: args.role.clone(),
        status: status.to_string(),
    };

    render(output, &report, |report, w| {
        writeln!(
            w,
            "Tracking {} at {} [{}] (id {})",
            report.role, report.company, report.status, report.id
        )
    })
}

/// Shared single-line summary used by list-style commands.
pub fn summary_line(app: &Application, w: &mut dyn Write) -> std::io::Result<()> {
    let priority = app.effective_priority();
    writeln!(
        w,
        "{:>8}  {:<22} {:<26} {:<10} {}",
        app.id.to_string(),
        truncate(&app.company, 22),
        truncate(&app.role, 26),
        app.status.to_string(),
        priority
    )
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}\u{2026}")
}
