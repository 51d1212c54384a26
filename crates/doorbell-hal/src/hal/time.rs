// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Monotonic time source for embedded platforms
///
/// Implementations must be callable from interrupt context: the edge
/// debouncer reads the clock inside the GPIO interrupt.
pub trait TimeProvider: Send + Sync {
    /// Get current time in microseconds since system boot
    ///
    /// # Returns
    /// Monotonic timestamp in microseconds
    fn get_time_us(&self) -> u64;
}
