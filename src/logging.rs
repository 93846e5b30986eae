use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Installs the diagnostic loggers: stderr always, plus `log_file` when given.
///
/// Stdout is reserved for the comparison report, so nothing here writes to it.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut builder = ConfigBuilder::new();
    builder.set_time_format_rfc3339();
    // Stays on UTC when the local offset can't be determined.
    let _ = builder.set_time_offset_to_local();
    let config = builder.build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: '{}'", path.display()))?;
        loggers.push(WriteLogger::new(level, config, file));
    }
    CombinedLogger::init(loggers).context("Failed to initialize logging")?;

    let started = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .format(&Rfc3339)
        .unwrap_or_default();
    info!("Starting xcomp v{} at {}", env!("CARGO_PKG_VERSION"), started);
    Ok(())
}
