// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging for the KPI report pipeline.
//!
//! Usage:
//! - Set KPI_LOG=off (default) - no logs
//! - Set KPI_LOG=info - one line per load and per saved file
//! - Set KPI_LOG=debug - SQL text and row counts as well

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

static INIT: Once = Once::new();

/// Environment variable selecting the log level.
pub const LOG_ENV: &str = "KPI_LOG";

/// Initialize diagnostics based on the KPI_LOG environment variable.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_diagnostics() {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());
    init_with_level(&level);
}

/// Initialize diagnostics at an explicit level, ignoring KPI_LOG.
pub fn init_with_level(level: &str) {
    INIT.call_once(|| {
        let min = match parse_level(level) {
            Some(None) => return,
            Some(Some(min)) => min,
            None => {
                // Bootstrap warning, the emitter is not set up yet
                eprintln!("Warning: Unknown {LOG_ENV} value '{level}', using 'info'");
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        // The runtime must outlive every event for the rest of the process
        std::mem::forget(rt);
    });
}

/// `Some(None)` means logging is off, `None` means the value is not a level.
fn parse_level(level: &str) -> Option<Option<emit::Level>> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" | "" => Some(None),
        "debug" => Some(Some(emit::Level::Debug)),
        "info" => Some(Some(emit::Level::Info)),
        "warn" => Some(Some(emit::Level::Warn)),
        "error" => Some(Some(emit::Level::Error)),
        _ => None,
    }
}

/// Log basic operations: session open, source loaded, file saved.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics such as SQL text and batch counts.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log conditions that do not stop the run.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that end the run.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
