// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hardware Abstraction Layer (HAL) trait definitions
//!
//! This module defines platform-agnostic traits that must be implemented
//! by each platform to provide:
//! - Time management (TimeProvider)
//! - Edge-triggered digital input (EdgeInterruptProvider)
//! - Network association (LinkLayer)
//! - Messaging session (SessionClient)
//! - Non-volatile configuration store (ConfigStore)
//! - Interrupt-to-task relay (RingSink / RingSource)

/// Edge-triggered digital input.
pub mod gpio;
/// Station-mode network association.
pub mod link;
/// Interrupt-safe relay queue contracts.
pub mod queue;
/// Remote messaging session.
pub mod session;
/// Non-volatile configuration store.
pub mod storage;
/// Timekeeping abstractions (monotonic timers, delays).
pub mod time;

pub use gpio::{EdgeHandler, EdgeInterruptProvider, PinNumber, Trigger};
pub use link::{
    AuthThreshold, CredentialsError, HandlerId, LinkEvent, LinkEventHandler, LinkLayer,
    StationCredentials,
};
pub use queue::{QueueFull, RingEvent, RingSink, RingSource};
pub use session::{
    NotificationMessage, SessionClient, SessionConfig, SessionEvent, SessionEventHandler,
    SessionUser, TransportError, INTENT_GUILD_MESSAGES,
};
pub use storage::{ConfigStore, StoreInitError};
pub use time::TimeProvider;

/// Error returned by driver-facing HAL operations
#[derive(Debug, thiserror::Error)]
pub enum HalError {
    /// The underlying driver call failed
    #[error("{operation} failed: {reason}")]
    Driver {
        /// Driver call that failed
        operation: &'static str,
        /// Platform-specific reason
        reason: String,
    },

    /// The caller passed a value the platform cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No handler with this id is registered
    #[error("Unknown handler id {0}")]
    UnknownHandler(u32),
}

impl HalError {
    /// Wrap a platform error for `operation`
    pub fn driver(operation: &'static str, reason: impl core::fmt::Display) -> Self {
        HalError::Driver {
            operation,
            reason: reason.to_string(),
        }
    }
}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;
