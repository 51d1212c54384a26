// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Doorbell Core
//!
//! Concurrency and state skeleton of the doorbell notifier:
//!
//! - **Bring-up**: bounded-retry Wi-Fi association that blocks until an
//!   outcome is known
//! - **Debounce**: interrupt-context edge filter feeding a bounded relay
//!   queue
//! - **Worker**: drains the relay queue and dispatches notifications only
//!   while the messaging session is connected
//!
//! Everything talks to hardware and remote services through the traits in
//! `doorbell-hal`.

pub mod boot;
pub mod bring_up;
pub mod connectivity;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod relay;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use boot::{boot, init_store, BootParts, RunningDoorbell};
pub use bring_up::{
    BringUpAction, BringUpCoordinator, BringUpPhase, BringUpStateMachine, ConnectionOutcome,
};
pub use connectivity::{session_event_channel, ConnectivityTracker, SessionConnectivity};
pub use debounce::{Debouncer, EdgeOutcome};
pub use dispatch::Dispatcher;
pub use error::{BootError, BringUpError, Result};
pub use relay::{relay_queue, RelayConsumer, RelayProducer};
pub use worker::DoorbellWorker;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
