//! Configuration validation
//!
//! Checks that the loaded configuration is usable on the device before
//! anything is brought up.

use crate::{ConfigError, ConfigResult, DoorbellConfig};

/// 802.11 limits for station credentials
const SSID_MAX_LEN: usize = 32;
const PASSWORD_MAX_LEN: usize = 64;
const PSK_MIN_LEN: usize = 8;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    TooLong { field: String, max: usize },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds {} bytes", field, max)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &DoorbellConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_wifi(config, &mut errors);
    validate_messaging(config, &mut errors);
    validate_relay(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_wifi(config: &DoorbellConfig, errors: &mut Vec<ConfigValidationError>) {
    let wifi = &config.wifi;

    if wifi.ssid.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "wifi.ssid".to_string(),
        });
    } else if wifi.ssid.len() > SSID_MAX_LEN {
        errors.push(ConfigValidationError::TooLong {
            field: "wifi.ssid".to_string(),
            max: SSID_MAX_LEN,
        });
    }

    if wifi.password.len() > PASSWORD_MAX_LEN {
        errors.push(ConfigValidationError::TooLong {
            field: "wifi.password".to_string(),
            max: PASSWORD_MAX_LEN,
        });
    }

    if wifi.auth_threshold.requires_password() && wifi.password.len() < PSK_MIN_LEN {
        errors.push(ConfigValidationError::InvalidValue {
            field: "wifi.password".to_string(),
            reason: format!(
                "must be at least {} bytes for the configured auth threshold",
                PSK_MIN_LEN
            ),
        });
    }
}

fn validate_messaging(config: &DoorbellConfig, errors: &mut Vec<ConfigValidationError>) {
    let messaging = &config.messaging;

    if messaging.bot_token.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "messaging.bot_token".to_string(),
        });
    }

    if messaging.login_attempts == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "messaging.login_attempts".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if messaging.channel_id.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "messaging.channel_id".to_string(),
        });
    } else if !messaging.channel_id.bytes().all(|b| b.is_ascii_digit()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "messaging.channel_id".to_string(),
            reason: "must be a numeric snowflake id".to_string(),
        });
    }

    if messaging.doorbell_message.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "messaging.doorbell_message".to_string(),
        });
    }

    if messaging.connection_message_enabled && messaging.connection_message.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "messaging.connection_message".to_string(),
        });
    }
}

fn validate_relay(config: &DoorbellConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.relay.queue_capacity == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "relay.queue_capacity".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if config.relay.worker_stack_size == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "relay.worker_stack_size".to_string(),
            reason: "must be positive".to_string(),
        });
    }
}
