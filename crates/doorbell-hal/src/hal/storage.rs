// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Reasons the non-volatile configuration store failed to initialize
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreInitError {
    /// The partition has no free pages left
    #[error("store has no free pages")]
    NoFreePages,

    /// The partition was written by a newer store format
    #[error("store contains data in a newer format")]
    NewVersionFound,

    #[error("store initialization failed: {0}")]
    Other(String),
}

impl StoreInitError {
    /// Whether erasing the partition and initializing again can fix this
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreInitError::NoFreePages | StoreInitError::NewVersionFound)
    }
}

/// Non-volatile key/value store used by the radio stack
pub trait ConfigStore {
    fn init(&mut self) -> Result<(), StoreInitError>;

    /// Erase the whole partition
    fn erase(&mut self) -> Result<(), StoreInitError>;
}
