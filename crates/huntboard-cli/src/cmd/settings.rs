//! `hb settings` — show or change tracker settings.

use clap::Args;
use std::io::Write;

use huntboard_core::model::settings::{Settings, SettingsPatch};
use huntboard_store::Store;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Applications per week to aim for.
    #[arg(long)]
    pub weekly_goal: Option<u32>,

    /// Applications per day to aim for.
    #[arg(long)]
    pub daily_goal: Option<u32>,

    /// Days before an applied role needs a follow-up.
    #[arg(long)]
    pub follow_up_days: Option<u32>,

    /// Days before an interview-stage role needs a follow-up.
    #[arg(long)]
    pub interview_follow_up_days: Option<u32>,

    /// Days of silence before suggesting the ghosted status.
    #[arg(long)]
    pub ghosted_days: Option<u32>,

    /// Missed days a streak survives (0-5).
    #[arg(long)]
    pub streak_grace_days: Option<u8>,
}

impl SettingsArgs {
    const fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            weekly_goal: self.weekly_goal,
            daily_goal: self.daily_goal,
            follow_up_days: self.follow_up_days,
            interview_follow_up_days: self.interview_follow_up_days,
            ghosted_days: self.ghosted_days,
            streak_grace_days: self.streak_grace_days,
            dark_mode: None,
        }
    }

    const fn is_empty(&self) -> bool {
        self.weekly_goal.is_none()
            && self.daily_goal.is_none()
            && self.follow_up_days.is_none()
            && self.interview_follow_up_days.is_none()
            && self.ghosted_days.is_none()
            && self.streak_grace_days.is_none()
    }
}

/// Execute `hb settings`. With no flags, shows the current values.
pub fn run_settings(
    args: &SettingsArgs,
    output: OutputMode,
    store: &mut dyn Store,
) -> anyhow::Result<()> {
    let settings = if args.is_empty() {
        store.get_settings()?
    } else {
        store.update_settings(args.to_patch())?
    };

    render(output, &settings, render_settings_human)
}

fn render_settings_human(settings: &Settings, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "weekly goal:               {}", settings.weekly_goal)?;
    writeln!(w, "daily goal:                {}", settings.daily_goal)?;
    writeln!(w, "follow-up after:           {} day(s)", settings.follow_up_days)?;
    writeln!(
        w,
        "interview follow-up after: {} day(s)",
        settings.interview_follow_up_days
    )?;
    writeln!(w, "ghosted after:             {} day(s)", settings.ghosted_days)?;
    writeln!(w, "streak grace:              {} day(s)", settings.streak_grace_days)?;
    Ok(())
}
