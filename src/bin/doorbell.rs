// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ESP32 doorbell firmware
//!
//! Boots with the configuration embedded at build time and then parks the
//! main task on the worker for the rest of the program.

use std::sync::Arc;

use anyhow::Context;
use doorbell::config::DoorbellConfig;
use doorbell::hal::platforms::esp32::{
    chip_model, DiscordSession, EspClock, EspEdgeInterrupts, EspFlashStore, EspLinkLayer,
    FreeRtosRelay,
};
use doorbell::observability::{init_console_logging, parse_debug_flags};
use doorbell::runtime::boot::session_config;
use doorbell::runtime::{boot, BootParts};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use tracing::info;

fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();

    let config: DoorbellConfig =
        doorbell::embedded_config().context("Embedded doorbell configuration is invalid")?;
    init_console_logging(&config.logging.level, &parse_debug_flags())?;
    info!(
        "Doorbell v{} starting on {} (bell on GPIO{})",
        doorbell::runtime::VERSION,
        chip_model(),
        config.bell.pin_number
    );

    let peripherals = Peripherals::take().context("Peripherals already taken")?;
    let sysloop = EspSystemEventLoop::take().context("System event loop unavailable")?;

    let parts = BootParts {
        store: EspFlashStore::new(),
        link: EspLinkLayer::new(peripherals.modem, sysloop)?,
        session: Arc::new(DiscordSession::new(&session_config(&config))),
        interrupts: EspEdgeInterrupts::new(),
        clock: EspClock,
        relay: FreeRtosRelay::create,
    };

    let running = boot(&config, parts)?;
    info!("Doorbell ready (network: {:?})", running.outcome());
    running.wait();

    Ok(())
}
