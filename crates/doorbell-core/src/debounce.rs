// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Doorbell edge debouncer.
//!
//! Runs inside the GPIO interrupt. An edge is a new ring only when strictly
//! more than `timeout` has passed since the previous *ring*; the first edge
//! after boot always rings. Suppressed edges leave the timestamp untouched,
//! so the quiet window is measured from the last ring and never extended by
//! bounces. A burst of edges lasting longer than `timeout` therefore rings
//! once per `timeout` window, even when no single gap exceeds it.

use std::time::Duration;

use doorbell_hal::{EdgeHandler, RingEvent, RingSink, TimeProvider};

/// What happened to one observed edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// New ring, token enqueued
    Rang,
    /// New ring, but the relay queue was full
    Dropped,
    /// Too close to the previous ring
    Suppressed,
}

/// `Duration` in whole microseconds, clamped to `u64::MAX`
pub(crate) fn saturating_micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

pub struct Debouncer<T, S> {
    clock: T,
    sink: S,
    timeout_us: u64,
    last_ring_us: Option<u64>,
}

impl<T, S> Debouncer<T, S>
where
    T: TimeProvider,
    S: RingSink,
{
    pub fn new(clock: T, sink: S, timeout: Duration) -> Self {
        Self {
            clock,
            sink,
            timeout_us: saturating_micros(timeout),
            last_ring_us: None,
        }
    }

    /// Time of the most recent ring, if any
    pub fn last_ring(&self) -> Option<Duration> {
        self.last_ring_us.map(Duration::from_micros)
    }

    /// Handle one rising edge. Never blocks.
    pub fn on_edge(&mut self) -> EdgeOutcome {
        let now = self.clock.get_time_us();

        if let Some(last) = self.last_ring_us {
            // A clock that steps backwards counts as no time elapsed
            if now.saturating_sub(last) <= self.timeout_us {
                #[cfg(not(target_os = "espidf"))]
                tracing::trace!("Edge suppressed, {}us since last ring", now.saturating_sub(last));
                return EdgeOutcome::Suppressed;
            }
        }

        self.last_ring_us = Some(now);
        match self.sink.try_push(RingEvent) {
            Ok(()) => EdgeOutcome::Rang,
            Err(_) => {
                #[cfg(not(target_os = "espidf"))]
                tracing::trace!("Relay queue full, ring dropped");
                EdgeOutcome::Dropped
            }
        }
    }
}

impl<T, S> Debouncer<T, S>
where
    T: TimeProvider + 'static,
    S: RingSink + 'static,
{
    /// Move the debouncer into an interrupt handler closure
    pub fn into_handler(mut self) -> EdgeHandler {
        Box::new(move || {
            self.on_edge();
        })
    }
}
