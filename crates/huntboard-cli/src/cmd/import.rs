//! `hb import` — load applications from a CSV export.

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use huntboard_core::csv::import_csv;
use huntboard_store::Store;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV file to read.
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    imported: usize,
}

/// Execute `hb import`. Rows inserted before a storage failure are kept;
/// a malformed file fails before anything is written.
pub fn run_import(
    args: &ImportArgs,
    output: OutputMode,
    store: &mut dyn Store,
) -> anyhow::Result<()> {
    let input = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let rows = import_csv(&input, Utc::now())?;

    let mut imported = 0_usize;
    for row in &rows {
        store.import_application(row)?;
        imported += 1;
    }

    let report = ImportReport { imported };
    render(output, &report, |report, w| {
        writeln!(w, "Imported {} application(s)", report.imported)
    })
}
