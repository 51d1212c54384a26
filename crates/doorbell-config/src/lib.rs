// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Doorbell Configuration
//!
//! Type-safe configuration for the doorbell notifier. The firmware embeds
//! `doorbell_configuration.toml` at build time, parses it from memory and
//! validates it before bringing anything up.
//!
//! ## Usage
//!
//! ```rust
//! use doorbell_config::{parse_config, validate_config};
//!
//! let config = parse_config(
//!     "[wifi]\nssid = \"porch\"\npassword = \"correct horse\"\n\
//!      [messaging]\nbot_token = \"token\"\nchannel_id = \"1234\"\n",
//! )
//! .expect("Failed to parse config");
//! validate_config(&config).expect("Invalid config");
//!
//! assert_eq!(config.bell.pin_number, 4);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::parse_config;
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Re-export for convenience
pub use serde;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
