// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Doorbell HAL
//!
//! Platform abstraction for the doorbell notifier.
//!
//! This crate provides:
//! - **HAL traits** (`hal` module) - contracts for every external collaborator
//!   the notifier talks to (link layer, session client, digital input,
//!   configuration store, clock, relay queue)
//! - **Platform implementations** (`platforms` module) - concrete
//!   implementations for ESP32 (hosts use the fakes in `doorbell-core`)
//!
//! ## Feature Flags
//!
//! - `esp32` - ESP32, ESP32-S3, ESP32-C3 support via `esp-idf-svc`

/// Hardware abstraction traits shared by all platforms.
pub mod hal;

/// Concrete platform implementations.
pub mod platforms;

pub use hal::*;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
