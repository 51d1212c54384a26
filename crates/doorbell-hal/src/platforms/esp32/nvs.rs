// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use esp_idf_svc::sys::{self as esp_idf_sys, esp, esp_err_t, EspError};

use crate::hal::{ConfigStore, StoreInitError};

/// Default NVS partition, used by the Wi-Fi driver for calibration data
#[derive(Debug, Default)]
pub struct EspFlashStore;

impl EspFlashStore {
    pub fn new() -> Self {
        Self
    }
}

fn classify(error: EspError) -> StoreInitError {
    let code = error.code();
    if code == esp_idf_sys::ESP_ERR_NVS_NO_FREE_PAGES as esp_err_t {
        StoreInitError::NoFreePages
    } else if code == esp_idf_sys::ESP_ERR_NVS_NEW_VERSION_FOUND as esp_err_t {
        StoreInitError::NewVersionFound
    } else {
        StoreInitError::Other(error.to_string())
    }
}

impl ConfigStore for EspFlashStore {
    fn init(&mut self) -> Result<(), StoreInitError> {
        esp!(unsafe { esp_idf_sys::nvs_flash_init() }).map_err(classify)
    }

    fn erase(&mut self) -> Result<(), StoreInitError> {
        esp!(unsafe { esp_idf_sys::nvs_flash_erase() })
            .map_err(|e| StoreInitError::Other(e.to_string()))
    }
}
