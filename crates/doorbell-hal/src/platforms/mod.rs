// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// ESP32 platform (ESP32, ESP32-S3, ESP32-C3)
#[cfg(feature = "esp32")]
pub mod esp32;

#[cfg(feature = "esp32")]
pub use esp32::{
    DiscordSession, EspClock, EspEdgeInterrupts, EspFlashStore, EspLinkLayer, FreeRtosRelay,
};
