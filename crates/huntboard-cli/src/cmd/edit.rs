//! `hb edit` — patch application fields.

use anyhow::bail;
use clap::Args;
use serde::Serialize;
use std::io::Write;

use huntboard_core::model::application::{ApplicationId, ApplicationPatch};
use huntboard_store::Store;

use crate::cmd::require_application;
use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    /// Application id.
    pub id: String,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub salary: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub platform: Option<String>,

    #[arg(long)]
    pub priority: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Clear the notes field.
    #[arg(long, conflicts_with = "notes")]
    pub clear_notes: bool,

    /// Hide from the board and from next actions.
    #[arg(long, conflicts_with = "unarchive")]
    pub archive: bool,

    #[arg(long)]
    pub unarchive: bool,
}

impl EditArgs {
    fn to_patch(&self) -> anyhow::Result<ApplicationPatch> {
        let mut patch = ApplicationPatch {
            company: self.company.clone(),
            role: self.role.clone(),
            location: self.location.clone().map(Some),
            salary: self.salary.clone().map(Some),
            url: self.url.clone().map(Some),
            ..ApplicationPatch::default()
        };
        if let Some(platform) = &self.platform {
            patch.platform = Some(platform.parse()?);
        }
        if let Some(priority) = &self.priority {
            patch.priority = Some(Some(priority.parse()?));
        }
        if self.clear_notes {
            patch.notes = Some(None);
        } else if let Some(notes) = &self.notes {
            patch.notes = Some(Some(notes.clone()));
        }
        if self.archive {
            patch.archived = Some(true);
        } else if self.unarchive {
            patch.archived = Some(false);
        }
        Ok(patch)
    }
}

#[derive(Debug, Serialize)]
struct EditReport {
    id: ApplicationId,
}

/// Execute `hb edit`.
pub fn run_edit(args: &EditArgs, output: OutputMode, store: &mut dyn Store) -> anyhow::Result<()> {
    let patch = args.to_patch()?;
    if patch.is_empty() {
        bail!("nothing to change; pass at least one field flag");
    }

    let app = require_application(store, &args.id, output)?;
    store.update_application(&app.id, &patch)?;

    let report = EditReport { id: app.id };
    render(output, &report, |report, w| {
        writeln!(w, "Updated {}", report.id)
    })
}

#[cfg(test)]
mod tests {
    use super::EditArgs;

    #[test]
    fn empty_args_build_an_empty_patch() {
        let args = EditArgs {
            id: "1".to_string(),
            ..EditArgs::default()
        };
        assert!(args.to_patch().expect("patch").is_empty());
    }

    #[test]
    fn clear_notes_patches_to_none() {
        let args = EditArgs {
            id: "1".to_string(),
            clear_notes: true,
            ..EditArgs::default()
        };
        let patch = args.to_patch().expect("patch");
        assert_eq!(patch.notes, Some(None));
    }

    #[test]
    fn bad_priority_is_rejected() {
        let args = EditArgs {
            id: "1".to_string(),
            priority: Some("urgent".to_string()),
            ..EditArgs::default()
        };
        assert!(args.to_patch().is_err());
    }
}
