// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # doorbell-observability
//!
//! Console logging setup for the firmware, with per-crate debug flag
//! support.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Workspace crates that accept a `--debug-<name>` flag
pub const KNOWN_CRATES: &[&str] = &[
    "doorbell",
    "doorbell-core",
    "doorbell-hal",
    "doorbell-config",
    "doorbell-observability",
];

/// Convert a crate name to the target prefix `tracing` uses for it
pub fn crate_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
