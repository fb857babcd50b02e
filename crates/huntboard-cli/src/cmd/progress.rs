//! `hb progress` — XP, level, streak, and badges.

use clap::Args;
use std::io::Write;

use huntboard_core::gamify::XP_LADDER;
use huntboard_core::model::progress::UserProgress;
use huntboard_store::Store;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct ProgressArgs {}

/// Execute `hb progress`.
pub fn run_progress(
    _args: &ProgressArgs,
    output: OutputMode,
    store: &mut dyn Store,
) -> anyhow::Result<()> {
    let progress = store.get_progress()?;
    render(output, &progress, render_progress_human)
}

fn render_progress_human(progress: &UserProgress, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Level {}  ({} XP)", progress.level, progress.xp)?;
    if let Some(next) = next_threshold(progress.xp) {
        writeln!(w, "  next level at {next} XP")?;
    }
    writeln!(
        w,
        "Streak: {} day(s) (longest {})",
        progress.current_streak, progress.longest_streak
    )?;
    writeln!(
        w,
        "Totals: {} applications, {} interviews, {} offers, {} follow-ups",
        progress.total_applications,
        progress.total_interviews,
        progress.total_offers,
        progress.total_follow_ups
    )?;
    if !progress.badges.is_empty() {
        writeln!(w, "Badges:")?;
        for badge in &progress.badges {
            writeln!(w, "  {badge}")?;
        }
    }
    Ok(())
}

fn next_threshold(xp: u32) -> Option<u32> {
    XP_LADDER.iter().copied().find(|&threshold| threshold > xp)
}

#[cfg(test)]
mod tests {
    use super::next_threshold;

    #[test]
    fn next_threshold_walks_the_ladder() {
        assert_eq!(next_threshold(0), Some(100));
        assert_eq!(next_threshold(100), Some(250));
        assert_eq!(next_threshold(11_000), None);
    }
}
