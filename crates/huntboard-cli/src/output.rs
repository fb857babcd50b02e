//! Shared output layer: every command renders either human text or stable
//! JSON from the same payload, so `--json` never changes what happened,
//! only how it is shown.

use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render a payload to stdout in the requested mode.
///
/// # Errors
///
/// I/O or serialization failure.
pub fn render<T: Serialize>(
    mode: OutputMode,
    payload: &T,
    human: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut w = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut w, payload)?;
            writeln!(w)?;
        }
        OutputMode::Human => human(payload, &mut w)?,
    }
    Ok(())
}

/// A user-facing failure with a stable machine-readable code.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub code: &'static str,
}

impl CliError {
    pub fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            error: error.into(),
            details: None,
            code,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        details: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
            code,
        }
    }
}

/// Render an error to stderr in the requested mode.
///
/// # Errors
///
/// I/O or serialization failure.
pub fn render_error(mode: OutputMode, err: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut w = stderr.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut w, err)?;
            writeln!(w)?;
        }
        OutputMode::Human => {
            writeln!(w, "error: {}", err.error)?;
            if let Some(details) = &err.details {
                writeln!(w, "  {details}")?;
            }
        }
    }
    Ok(())
}
