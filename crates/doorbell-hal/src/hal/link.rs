// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Station-mode network association.
//!
//! The link layer is event-driven: `start()` and `connect()` return as soon
//! as the request is queued and the result arrives later as a [`LinkEvent`]
//! delivered to every registered [`LinkEventHandler`].

use core::fmt;
use std::net::Ipv4Addr;

use crate::hal::HalResult;

/// Longest SSID accepted by 802.11
pub const SSID_CAPACITY: usize = 32;
/// Longest WPA passphrase
pub const PASSWORD_CAPACITY: usize = 64;

/// Lifecycle events emitted by the station interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// The station interface finished starting
    StationStarted,
    /// Association was lost or could not be established
    StationDisconnected {
        /// Platform reason code
        reason: u16,
    },
    /// DHCP handed out an address
    AddressAcquired {
        /// Assigned IPv4 address
        ip: Ipv4Addr,
    },
}

/// Observer invoked from the platform's event context
pub type LinkEventHandler = Box<dyn Fn(LinkEvent) + Send + Sync + 'static>;

/// Opaque registration token returned by [`LinkLayer::register_handler`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u32);

/// Weakest access point security accepted during association
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthThreshold {
    Open,
    Wep,
    WpaPersonal,
    #[default]
    Wpa2Personal,
    Wpa3Personal,
}

/// Credentials do not fit the 802.11 limits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("SSID longer than 32 bytes")]
    SsidTooLong,
    #[error("password longer than 64 bytes")]
    PasswordTooLong,
}

/// Access point credentials for station mode
#[derive(Clone, PartialEq, Eq)]
pub struct StationCredentials {
    pub ssid: heapless::String<SSID_CAPACITY>,
    pub password: heapless::String<PASSWORD_CAPACITY>,
    pub auth_threshold: AuthThreshold,
}

impl StationCredentials {
    /// Build credentials with the default WPA2-Personal threshold
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialsError> {
        Self::with_threshold(ssid, password, AuthThreshold::default())
    }

    pub fn with_threshold(
        ssid: &str,
        password: &str,
        auth_threshold: AuthThreshold,
    ) -> Result<Self, CredentialsError> {
        let ssid = heapless::String::try_from(ssid).map_err(|_| CredentialsError::SsidTooLong)?;
        let password = heapless::String::try_from(password)
            .map_err(|_| CredentialsError::PasswordTooLong)?;
        Ok(Self {
            ssid,
            password,
            auth_threshold,
        })
    }
}

// Keeps the passphrase out of logs
impl fmt::Debug for StationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("auth_threshold", &self.auth_threshold)
            .finish()
    }
}

/// Station-mode link layer driver
pub trait LinkLayer: Send {
    /// Put the radio in station (client) mode
    fn set_station_mode(&mut self) -> HalResult<()>;

    /// Apply the access point credentials
    fn set_credentials(&mut self, credentials: &StationCredentials) -> HalResult<()>;

    /// Start the station interface; completion is reported as
    /// [`LinkEvent::StationStarted`]
    fn start(&mut self) -> HalResult<()>;

    /// Request association; the outcome is reported as an event
    fn connect(&mut self) -> HalResult<()>;

    /// Register an event observer
    fn register_handler(&mut self, handler: LinkEventHandler) -> HalResult<HandlerId>;

    /// Remove a previously registered observer
    fn unregister_handler(&mut self, id: HandlerId) -> HalResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_default_threshold() {
        let creds = StationCredentials::new("porch", "hunter22").unwrap();
        assert_eq!(creds.auth_threshold, AuthThreshold::Wpa2Personal);
        assert_eq!(creds.ssid.as_str(), "porch");
    }

    #[test]
    fn test_credentials_length_limits() {
        let long_ssid = "s".repeat(SSID_CAPACITY + 1);
        assert_eq!(
            StationCredentials::new(&long_ssid, "").unwrap_err(),
            CredentialsError::SsidTooLong
        );

        let long_password = "p".repeat(PASSWORD_CAPACITY + 1);
        assert_eq!(
            StationCredentials::new("porch", &long_password).unwrap_err(),
            CredentialsError::PasswordTooLong
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = StationCredentials::new("porch", "hunter22").unwrap();
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("porch"));
        assert!(!rendered.contains("hunter22"));
    }
}
