// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `doorbell_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DoorbellConfig {
    pub wifi: WifiConfig,
    pub bell: BellConfig,
    pub messaging: MessagingConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

/// Minimum protection level accepted when associating with an access point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WifiAuthThreshold {
    Open,
    Wep,
    WpaPersonal,
    Wpa2Personal,
    Wpa3Personal,
}

impl WifiAuthThreshold {
    /// Whether this threshold implies a pre-shared key
    pub fn requires_password(&self) -> bool {
        !matches!(self, WifiAuthThreshold::Open)
    }
}

/// Wi-Fi station credentials and bring-up retry ceiling
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: String,
    pub password: String,
    pub maximum_retry: u32,
    pub auth_threshold: WifiAuthThreshold,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            password: String::new(),
            maximum_retry: 5,
            auth_threshold: WifiAuthThreshold::Wpa2Personal,
        }
    }
}

/// Doorbell button input
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BellConfig {
    /// GPIO number the button is wired to
    pub pin_number: i32,
    /// Minimum quiet interval between two rings, in seconds
    pub timeout_secs: u64,
}

impl BellConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BellConfig {
    fn default() -> Self {
        Self {
            pin_number: 4,
            timeout_secs: 5,
        }
    }
}

/// Messaging session and notification content
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MessagingConfig {
    pub bot_token: String,
    pub channel_id: String,
    pub doorbell_message: String,
    pub connection_message_enabled: bool,
    pub connection_message: String,
    /// Gateway intents bitmask requested at session creation
    pub intents: u32,
    /// Login attempts made at boot before giving up
    pub login_attempts: u32,
    pub login_retry_backoff_ms: u64,
}

impl MessagingConfig {
    pub fn login_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.login_retry_backoff_ms)
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            channel_id: String::new(),
            doorbell_message: "Ding dong! Someone is at the door.".to_string(),
            connection_message_enabled: false,
            connection_message: "Doorbell is online.".to_string(),
            intents: 1 << 9, // GUILD_MESSAGES
            login_attempts: 3,
            login_retry_backoff_ms: 2000,
        }
    }
}

/// Relay queue and worker task sizing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    pub queue_capacity: usize,
    pub worker_stack_size: usize,
    pub worker_name: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10,
            worker_stack_size: 8192,
            worker_name: "doorbell-worker".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
