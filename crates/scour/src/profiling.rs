//! Chrome trace output for `--profile <path>`.
//!
//! The engine's `refactor`, `reconcile` and `clean_source` spans end up in
//! the trace; open it in `chrome://tracing` or https://ui.perfetto.dev/

use std::path::PathBuf;

use tracing_subscriber::prelude::*;

/// Flushes the trace file when dropped, so hold it until the command is done.
pub struct TraceGuard {
    _flush: tracing_chrome::FlushGuard,
}

pub fn start(output: Option<PathBuf>) -> Option<TraceGuard> {
    let output = output?;
    log::debug!("Writing trace to {}", output.display());

    let (layer, flush) = tracing_chrome::ChromeLayerBuilder::new()
        .file(output)
        .include_args(true)
        .build();

    // A subscriber may already be installed (tests); keep it
    let _ = tracing_subscriber::registry().with(layer).try_init();

    Some(TraceGuard { _flush: flush })
}
