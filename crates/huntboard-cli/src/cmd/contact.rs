//! `hb contact` — attach a person to an application.

use clap::Args;
use serde::Serialize;
use std::io::Write;

use huntboard_core::model::contact::ContactDraft;
use huntboard_store::Store;

use crate::cmd::require_application;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ContactArgs {
    /// Application id.
    pub id: String,

    /// Contact name.
    pub name: String,

    /// Their role (recruiter, hiring manager, ...).
    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub linkedin: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactReport {
    name: String,
    company: String,
}

/// Execute `hb contact`.
pub fn run_contact(
    args: &ContactArgs,
    output: OutputMode,
    store: &mut dyn Store,
) -> anyhow::Result<()> {
    let app = require_application(store, &args.id, output)?;

    let mut draft = ContactDraft::new(&args.name);
    draft.role = args.role.clone();
    draft.email = args.email.clone();
    draft.phone = args.phone.clone();
    draft.linkedin = args.linkedin.clone();
    draft.notes = args.notes.clone();
    store.add_contact(&app.id, draft)?;

    let report = ContactReport {
        name: args.name.clone(),
        company: app.company,
    };
    render(output, &report, |report, w| {
        writeln!(w, "Added {} to {}", report.name, report.company)
    })
}
