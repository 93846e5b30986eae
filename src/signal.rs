use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::warn;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Routes Ctrl+C into a flag that directory indexing polls between files.
pub fn install_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        warn!("Interrupt received, stopping");
        INTERRUPTED.store(true, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl+C handler")
}

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::Relaxed)
}
