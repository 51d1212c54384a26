// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use esp_idf_svc::sys as esp_idf_sys;

use crate::hal::TimeProvider;

/// High resolution timer since boot; safe to read from an ISR
#[derive(Debug, Clone, Copy, Default)]
pub struct EspClock;

impl TimeProvider for EspClock {
    fn get_time_us(&self) -> u64 {
        unsafe { esp_idf_sys::esp_timer_get_time() as u64 }
    }
}
