//! `hb list` — the board as a flat list.

use clap::Args;
use std::io::Write;

use huntboard_core::model::application::{Application, Platform, Status};
use huntboard_store::Store;

use crate::cmd::add::summary_line;
use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only show this pipeline status.
    #[arg(long)]
    pub status: Option<String>,

    /// Only show this platform.
    #[arg(long)]
    pub platform: Option<String>,

    /// Include archived applications.
    #[arg(long)]
    pub all: bool,
}

/// Execute `hb list`.
pub fn run_list(args: &ListArgs, output: OutputMode, store: &mut dyn Store) -> anyhow::Result<()> {
    let status: Option<Status> = args.status.as_deref().map(str::parse).transpose()?;
    let platform: Option<Platform> = args.platform.as_deref().map(str::parse).transpose()?;

    let apps: Vec<Application> = store
        .list_applications()?
        .into_iter()
        .filter(|app| args.all || !app.archived)
        .filter(|app| status.is_none_or(|s| app.status == s))
        .filter(|app| platform.is_none_or(|p| app.platform == p))
        .collect();

    render(output, &apps, |apps, w| {
        if apps.is_empty() {
            return writeln!(w, "No applications tracked yet. Try `hb add`.");
        }
        writeln!(
            w,
            "{:>8}  {:<22} {:<26} {:<10} {}",
            "ID", "COMPANY", "ROLE", "STATUS", "PRIORITY"
        )?;
        for app in apps {
            summary_line(app, w)?;
        }
        writeln!(w, "\n{} application(s)", apps.len())
    })
}
