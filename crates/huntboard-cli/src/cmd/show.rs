//! `hb show` — full detail for one application.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use chrono::Utc;
use huntboard_core::model::application::Application;
use huntboard_core::model::contact::Contact;
use huntboard_core::model::event::ApplicationEvent;
use huntboard_core::views::{days_in_stage, days_since_last_touch};
use huntboard_store::Store;

use crate::cmd::require_application;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Application id.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct ShowReport {
    #[serde(flatten)]
    application: Application,
    days_in_stage: i64,
    days_since_last_touch: i64,
    events: Vec<ApplicationEvent>,
    contacts: Vec<Contact>,
}

/// Execute `hb show`.
pub fn run_show(args: &ShowArgs, output: OutputMode, store: &mut dyn Store) -> anyhow::Result<()> {
    let app = require_application(store, &args.id, output)?;
    let events = store.list_events(&app.id)?;
    let contacts = store.list_contacts(&app.id)?;

    let now = Utc::now();
    let report = ShowReport {
        days_in_stage: days_in_stage(&app, now),
        days_since_last_touch: days_since_last_touch(&app, now),
        application: app,
        events,
        contacts,
    };

    render(output, &report, |report, w| {
        let app = &report.application;
        writeln!(w, "{} at {}  [{}]", app.role, app.company, app.status)?;
        writeln!(w, "{:-<60}", "")?;
        kv(w, "id", &app.id.to_string())?;
        kv(w, "platform", &app.platform.to_string())?;
        kv(w, "priority", &app.effective_priority().to_string())?;
        if let Some(location) = &app.location {
            kv(w, "location", location)?;
        }
        if let Some(salary) = &app.salary {
            kv(w, "salary", salary)?;
        }
        if let Some(url) = &app.url {
            kv(w, "url", url)?;
        }
        if let Some(applied_at) = app.applied_at {
            kv(w, "applied", &applied_at.format("%Y-%m-%d").to_string())?;
        }
        kv(w, "in stage", &format!("{} day(s)", report.days_in_stage))?;
        kv(
            w,
            "last touch",
            &format!("{} day(s) ago", report.days_since_last_touch),
        )?;
        if app.archived {
            kv(w, "archived", "yes")?;
        }
        if let Some(notes) = &app.notes {
            writeln!(w, "\n{notes}")?;
        }

        if !report.contacts.is_empty() {
            writeln!(w, "\nContacts:")?;
            for contact in &report.contacts {
                let role = contact.role.as_deref().unwrap_or("-");
                let email = contact.email.as_deref().unwrap_or("-");
                writeln!(w, "  {} ({role}) {email}", contact.name)?;
            }
        }

        if !report.events.is_empty() {
            writeln!(w, "\nTimeline:")?;
            for event in &report.events {
                writeln!(
                    w,
                    "  {}  {:<13} {}",
                    event.event_date.format("%Y-%m-%d"),
                    event.kind.to_string(),
                    event.title
                )?;
            }
        }
        Ok(())
    })
}

fn kv(w: &mut dyn Write, key: &str, value: &str) -> std::io::Result<()> {
    writeln!(w, "{:<12} {value}", format!("{key}:"))
}
