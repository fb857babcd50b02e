//! `hb export` — write the board as CSV.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use huntboard_core::csv::export_csv;
use huntboard_store::Store;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Write to a file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    rows: usize,
    path: PathBuf,
}

/// Execute `hb export`.
pub fn run_export(
    args: &ExportArgs,
    output: OutputMode,
    store: &mut dyn Store,
) -> anyhow::Result<()> {
    let apps = store.list_applications()?;
    let csv = export_csv(&apps);

    match &args.output {
        Some(path) => {
            std::fs::write(path, &csv)?;
            let report = ExportReport {
                rows: apps.len(),
                path: path.clone(),
            };
            render(output, &report, |report, w| {
                writeln!(w, "Wrote {} row(s) to {}", report.rows, report.path.display())
            })
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            w.write_all(csv.as_bytes())?;
            Ok(())
        }
    }
}
