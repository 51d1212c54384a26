// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ESP32 platform implementation
//!
//! Supports ESP32, ESP32-S3, ESP32-C3 (RISC-V) variants. Everything here
//! runs on top of ESP-IDF through `esp-idf-svc`.

mod clock;
mod discord;
mod gpio;
mod nvs;
mod queue;
mod wifi;

pub use clock::EspClock;
pub use discord::DiscordSession;
pub use gpio::EspEdgeInterrupts;
pub use nvs::EspFlashStore;
pub use queue::{FreeRtosRelay, FreeRtosRingSink, FreeRtosRingSource};
pub use wifi::EspLinkLayer;

use esp_idf_svc::sys::EspError;

use crate::hal::HalError;

pub(crate) fn driver_error(operation: &'static str) -> impl FnOnce(EspError) -> HalError {
    move |e| HalError::driver(operation, e)
}

/// Chip model selected at build time
pub fn chip_model() -> &'static str {
    if cfg!(feature = "esp32-s3") {
        "ESP32-S3"
    } else if cfg!(feature = "esp32-c3") {
        "ESP32-C3"
    } else {
        "ESP32"
    }
}
