//! `hb stats` — funnel analytics.

use clap::Args;
use std::io::Write;

use huntboard_core::views::{Analytics, calculate_analytics};
use huntboard_store::Store;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

/// Execute `hb stats`.
pub fn run_stats(
    _args: &StatsArgs,
    output: OutputMode,
    store: &mut dyn Store,
) -> anyhow::Result<()> {
    let apps = store.list_applications()?;
    let analytics = calculate_analytics(&apps);

    render(output, &analytics, render_stats_human)
}

fn render_stats_human(analytics: &Analytics, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Funnel")?;
    writeln!(w, "  tracked:           {}", analytics.total)?;
    writeln!(w, "  applied:           {}", analytics.applied)?;
    writeln!(w, "  response rate:     {}%", analytics.response_rate)?;
    writeln!(w, "  interview rate:    {}%", analytics.interview_rate)?;
    writeln!(
        w,
        "  avg response time: {} day(s)",
        analytics.avg_time_to_response_days
    )?;

    if !analytics.platforms.is_empty() {
        writeln!(w, "\nBy platform:")?;
        for (platform, stats) in &analytics.platforms {
            writeln!(
                w,
                "  {:<14} {:>3} tracked, {:>3} applied, {:>3}% response, {:>3}% interview",
                platform.to_string(),
                stats.total,
                stats.applied,
                stats.response_rate,
                stats.interview_rate
            )?;
        }
    }
    Ok(())
}
