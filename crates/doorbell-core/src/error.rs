// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the doorbell core

use doorbell_hal::{CredentialsError, HalError, StoreInitError};

/// Result type alias using BootError
pub type Result<T> = std::result::Result<T, BootError>;

/// Bring-up could not even be attempted
///
/// Exhausting the retry budget is not an error; it is reported as
/// [`ConnectionOutcome::FailedPermanently`](crate::ConnectionOutcome).
#[derive(Debug, thiserror::Error)]
pub enum BringUpError {
    #[error("Invalid station credentials: {0}")]
    Credentials(#[from] CredentialsError),

    /// Setting the mode, credentials, starting the station or registering
    /// the event handler failed
    #[error("Link layer error: {0}")]
    Link(#[from] HalError),
}

/// Errors that abort the boot sequence
#[derive(Debug, thiserror::Error)]
pub enum BootError {
    /// The configuration store could not be initialized, even after an erase
    #[error("Configuration store error: {0}")]
    Store(#[from] StoreInitError),

    #[error("Network bring-up error: {0}")]
    BringUp(#[from] BringUpError),

    /// Installing the interrupt service or attaching the bell handler failed
    #[error("Interrupt setup error: {0}")]
    Interrupt(HalError),

    #[error("Failed to spawn thread '{name}': {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
