// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Relay between interrupt context and a worker task.
//!
//! The producer side must never block: it is called from an interrupt.

/// One doorbell press that survived debouncing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingEvent;

/// The relay queue was full and the event was not enqueued
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("relay queue is full")]
pub struct QueueFull;

/// Producer half, usable from interrupt context
pub trait RingSink: Send {
    /// Enqueue without blocking. On `Err(QueueFull)` the queue is unchanged.
    fn try_push(&self, event: RingEvent) -> Result<(), QueueFull>;
}

/// Consumer half, owned by the worker
pub trait RingSource: Send {
    /// Block until an event is available.
    ///
    /// Returns `None` once every producer is gone and the queue is drained.
    fn recv(&self) -> Option<RingEvent>;
}
