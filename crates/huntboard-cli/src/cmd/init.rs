//! `hb init` — create the local data directory and database.

use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use huntboard_core::config::AppConfig;
use huntboard_store::LocalStore;
use huntboard_store::dispatch::LOCAL_DB_FILE;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct InitArgs {}

#[derive(Debug, Serialize)]
struct InitReport {
    path: PathBuf,
    created: bool,
}

/// Execute `hb init`. Safe to run twice; an existing database is left
/// untouched.
pub fn run_init(_args: &InitArgs, output: OutputMode, config: &AppConfig) -> anyhow::Result<()> {
    let path = config.resolve_data_dir().join(LOCAL_DB_FILE);
    let created = !path.exists();
    drop(LocalStore::open(&path)?);

    let report = InitReport { path, created };
    render(output, &report, |report, w| {
        if report.created {
            writeln!(w, "Initialized {}", report.path.display())
        } else {
            writeln!(w, "Already initialized at {}", report.path.display())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{InitArgs, run_init};
    use crate::output::OutputMode;
    use huntboard_core::config::AppConfig;

    #[test]
    fn init_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            data_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        run_init(&InitArgs::default(), OutputMode::Human, &config).expect("first");
        run_init(&InitArgs::default(), OutputMode::Human, &config).expect("second");
        assert!(dir.path().join("huntboard.db").exists());
    }
}
