// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! The device logs to the console (UART) only.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;

/// Build the filter from a base level plus per-crate debug flags
pub fn build_filter(base_level: &str, debug_flags: &CrateDebugFlags) -> Result<EnvFilter> {
    let directives = debug_flags.to_filter_string(&base_level.to_lowercase());
    EnvFilter::try_new(&directives).map_err(|e| anyhow!("Invalid log filter '{}': {}", directives, e))
}

/// Initialize console-only logging (used on the device)
///
/// # Errors
/// Fails on an invalid level string or if a global subscriber is already set.
pub fn init_console_logging(base_level: &str, debug_flags: &CrateDebugFlags) -> Result<()> {
    let filter = build_filter(base_level, debug_flags)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
