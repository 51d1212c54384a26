// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Doorbell
//!
//! Posts a message to a Discord channel when a physical doorbell button is
//! pressed. The device first joins Wi-Fi with a bounded number of retries,
//! then logs the bot in; rings are debounced in the GPIO interrupt and
//! relayed to a worker that only sends while the bot session is up.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: doorbell-config, doorbell-observability    │
//! │  (TOML configuration, tracing setup)                    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Platform: doorbell-hal                                 │
//! │  (LinkLayer, SessionClient, EdgeInterruptProvider, ...) │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Core: doorbell-core                                    │
//! │  (bring-up, debounce, relay queue, worker, boot)        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Feature Flags
//!
//! - **`esp32`** / **`esp32-s3`** / **`esp32-c3`**: build the `doorbell`
//!   firmware binary
//!
//! ## License
//!
//! Apache-2.0

pub use doorbell_config as config;
pub use doorbell_core as runtime;
pub use doorbell_hal as hal;
pub use doorbell_observability as observability;

/// Configuration embedded into the firmware image
pub const EMBEDDED_CONFIGURATION: &str = include_str!("../doorbell_configuration.toml");

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{parse_config, validate_config, DoorbellConfig};
    pub use crate::hal::{
        EdgeInterruptProvider, LinkLayer, NotificationMessage, RingSink, RingSource,
        SessionClient, SessionEvent, TimeProvider,
    };
    pub use crate::runtime::{
        boot, BootError, BootParts, ConnectionOutcome, RunningDoorbell, SessionConnectivity,
    };
}

/// Parse and validate the embedded configuration
pub fn embedded_config() -> config::ConfigResult<config::DoorbellConfig> {
    let config = config::parse_config(EMBEDDED_CONFIGURATION)?;
    config::validate_config(&config)?;
    Ok(config)
}
