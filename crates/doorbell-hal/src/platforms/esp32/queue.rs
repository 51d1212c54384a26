// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! FreeRTOS queue relay.
//!
//! `Queue::send_back` switches to the `FromISR` variant when called from an
//! interrupt, so the sink can be used directly inside the GPIO handler.

use std::sync::Arc;

use esp_idf_svc::hal::delay::BLOCK;
use esp_idf_svc::hal::task::queue::Queue;

use crate::hal::{QueueFull, RingEvent, RingSink, RingSource};

// One byte per slot; FreeRTOS does not need a payload for a unit token
const TOKEN: u8 = 1;

/// Factory for the two halves of a FreeRTOS-backed relay queue
pub struct FreeRtosRelay;

impl FreeRtosRelay {
    pub fn create(capacity: usize) -> (FreeRtosRingSink, FreeRtosRingSource) {
        let queue = Arc::new(Queue::new(capacity));
        (
            FreeRtosRingSink {
                queue: Arc::clone(&queue),
            },
            FreeRtosRingSource { queue },
        )
    }
}

pub struct FreeRtosRingSink {
    queue: Arc<Queue<u8>>,
}

impl RingSink for FreeRtosRingSink {
    fn try_push(&self, _event: RingEvent) -> Result<(), QueueFull> {
        // A zero timeout never blocks, in or out of an ISR
        self.queue.send_back(TOKEN, 0).map(|_| ()).map_err(|_| QueueFull)
    }
}

pub struct FreeRtosRingSource {
    queue: Arc<Queue<u8>>,
}

impl RingSource for FreeRtosRingSource {
    fn recv(&self) -> Option<RingEvent> {
        // Producers live for the whole program, so waiting forever is fine
        loop {
            if self.queue.recv_front(BLOCK).is_some() {
                return Some(RingEvent);
            }
        }
    }
}
