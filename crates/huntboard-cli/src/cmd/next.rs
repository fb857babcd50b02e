//! `hb next` — suggested actions across the board.

use clap::Args;
use std::io::Write;

use chrono::Utc;
use huntboard_core::views::{ActionKind, NextAction, next_actions};
use huntboard_store::Store;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct NextArgs {
    /// Show at most this many suggestions.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

/// Execute `hb next`.
pub fn run_next(args: &NextArgs, output: OutputMode, store: &mut dyn Store) -> anyhow::Result<()> {
    let apps = store.list_applications()?;
    let settings = store.get_settings()?;

    let mut actions = next_actions(&apps, &settings, Utc::now());
    actions.truncate(args.limit);

    render(output, &actions, |actions, w| {
        if actions.is_empty() {
            return writeln!(w, "Nothing pending. Go find a posting worth saving.");
        }
        for action in actions {
            writeln!(
                w,
                "[{:<6}] {:<9} {} at {} (id {})",
                action.priority.to_string(),
                verb(action),
                action.role,
                action.company,
                action.application_id
            )?;
        }
        Ok(())
    })
}

const fn verb(action: &NextAction) -> &'static str {
    match action.kind {
        ActionKind::Apply => "apply",
        ActionKind::FollowUp => "follow up",
        ActionKind::Prep => "prep",
    }
}
