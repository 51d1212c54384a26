// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration parsing
//!
//! The device has no filesystem to search, so the TOML file is embedded at
//! build time and parsed from memory. Every section is optional; missing
//! keys fall back to the defaults in [`crate::types`].

use crate::{ConfigResult, DoorbellConfig};

/// Parse configuration from TOML text
///
/// # Errors
///
/// Returns `ConfigError::ParseError` on malformed TOML or mistyped values
pub fn parse_config(content: &str) -> ConfigResult<DoorbellConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config("[wifi]\nssid = \"porch\"\n[bell]\npin_number = 13\n").unwrap();

        assert_eq!(config.wifi.ssid, "porch");
        assert_eq!(config.bell.pin_number, 13);
        // untouched sections keep their defaults
        assert_eq!(config.bell.timeout_secs, 5);
        assert_eq!(config.relay.queue_capacity, 10);
    }

    #[test]
    fn test_parse_empty_document_is_all_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.wifi.maximum_retry, 5);
        assert_eq!(config.messaging.intents, 512);
    }

    #[test]
    fn test_parse_config_rejects_bad_toml() {
        let result = parse_config("[wifi\nssid = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_parse_config_rejects_mistyped_value() {
        let result = parse_config("[bell]\ntimeout_secs = \"five\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_parse_auth_threshold() {
        let config = parse_config("[wifi]\nauth_threshold = \"wpa3-personal\"\n").unwrap();
        assert_eq!(
            config.wifi.auth_threshold,
            crate::WifiAuthThreshold::Wpa3Personal
        );
    }
}
