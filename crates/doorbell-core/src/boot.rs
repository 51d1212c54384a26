// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Boot sequence
//!
//! 1. Initialize the configuration store (erase and retry once on a
//!    recoverable error)
//! 2. Bring the network up; the outcome is logged and boot continues either
//!    way
//! 3. Wire the session observer to the connectivity tracker and log in,
//!    retrying a bounded number of times
//! 4. Create the relay queue and start the worker
//! 5. Arm the doorbell interrupt

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use doorbell_config::{DoorbellConfig, WifiAuthThreshold};
use doorbell_hal::{
    AuthThreshold, ConfigStore, EdgeInterruptProvider, LinkLayer, NotificationMessage, RingSink,
    RingSource, SessionClient, SessionConfig, StationCredentials, StoreInitError, TimeProvider,
    TransportError, Trigger,
};
use tracing::{info, warn};

use crate::bring_up::{BringUpCoordinator, ConnectionOutcome};
use crate::connectivity::{session_event_channel, ConnectivityTracker, SessionConnectivity};
use crate::debounce::Debouncer;
use crate::dispatch::Dispatcher;
use crate::error::{BootError, BringUpError, Result};
use crate::worker::DoorbellWorker;

const TRACKER_THREAD_NAME: &str = "doorbell-session";

/// Platform services handed to [`boot`]
pub struct BootParts<S, L, C, G, T, F> {
    pub store: S,
    pub link: L,
    pub session: Arc<C>,
    pub interrupts: G,
    pub clock: T,
    /// Creates the relay queue halves for a given capacity
    pub relay: F,
}

/// A booted doorbell. Dropping it releases the link layer and interrupt
/// handlers, so firmware keeps it alive for the life of the program.
pub struct RunningDoorbell<L, C: ?Sized, G> {
    outcome: ConnectionOutcome,
    connectivity: SessionConnectivity,
    link: L,
    session: Arc<C>,
    interrupts: G,
    worker: JoinHandle<()>,
    tracker: JoinHandle<()>,
}

impl<L, C: ?Sized, G> RunningDoorbell<L, C, G> {
    pub fn outcome(&self) -> ConnectionOutcome {
        self.outcome
    }

    pub fn connectivity(&self) -> &SessionConnectivity {
        &self.connectivity
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn session(&self) -> &Arc<C> {
        &self.session
    }

    pub fn interrupts_mut(&mut self) -> &mut G {
        &mut self.interrupts
    }

    pub fn worker_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Block until the worker exits, which on a device is never
    pub fn wait(self) {
        if self.worker.join().is_err() {
            warn!("Doorbell worker panicked");
        }
        drop(self.tracker);
    }
}

/// Initialize `store`, erasing it once if the error is recoverable
pub fn init_store<S: ConfigStore + ?Sized>(store: &mut S) -> std::result::Result<(), StoreInitError> {
    match store.init() {
        Ok(()) => Ok(()),
        Err(e) if e.is_recoverable() => {
            warn!("Configuration store unusable ({}), erasing", e);
            store.erase()?;
            store.init()
        }
        Err(e) => Err(e),
    }
}

pub fn auth_threshold(threshold: WifiAuthThreshold) -> AuthThreshold {
    match threshold {
        WifiAuthThreshold::Open => AuthThreshold::Open,
        WifiAuthThreshold::Wep => AuthThreshold::Wep,
        WifiAuthThreshold::WpaPersonal => AuthThreshold::WpaPersonal,
        WifiAuthThreshold::Wpa2Personal => AuthThreshold::Wpa2Personal,
        WifiAuthThreshold::Wpa3Personal => AuthThreshold::Wpa3Personal,
    }
}

/// Call `login` until it succeeds or `attempts` calls have failed, pausing
/// `backoff` between calls. At least one attempt is always made.
pub fn login_with_retry<C: SessionClient + ?Sized>(
    session: &C,
    attempts: u32,
    backoff: Duration,
) -> std::result::Result<(), TransportError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match session.login() {
            Ok(()) => return Ok(()),
            Err(e) if attempt >= attempts => return Err(e),
            Err(e) => {
                warn!("Session login attempt {}/{} failed: {}", attempt, attempts, e);
                thread::sleep(backoff);
                attempt += 1;
            }
        }
    }
}

/// Session client parameters derived from the messaging section
pub fn session_config(config: &DoorbellConfig) -> SessionConfig {
    SessionConfig {
        token: config.messaging.bot_token.clone(),
        intents: config.messaging.intents,
    }
}

/// Run the full boot sequence and return the running system
pub fn boot<S, L, C, G, T, F, P, R>(
    config: &DoorbellConfig,
    parts: BootParts<S, L, C, G, T, F>,
) -> Result<RunningDoorbell<L, C, G>>
where
    S: ConfigStore,
    L: LinkLayer,
    C: SessionClient + 'static,
    G: EdgeInterruptProvider,
    T: TimeProvider + 'static,
    F: FnOnce(usize) -> (P, R),
    P: RingSink + 'static,
    R: RingSource + 'static,
{
    let BootParts {
        mut store,
        mut link,
        session,
        mut interrupts,
        clock,
        relay,
    } = parts;

    init_store(&mut store)?;
    info!("Configuration store ready");

    let credentials = StationCredentials::with_threshold(
        &config.wifi.ssid,
        &config.wifi.password,
        auth_threshold(config.wifi.auth_threshold),
    )
    .map_err(BringUpError::from)?;
    let outcome = BringUpCoordinator::new(&mut link)
        .bring_up_with(&credentials, config.wifi.maximum_retry)?;
    if outcome != ConnectionOutcome::Connected {
        warn!("Continuing boot without network ({:?})", outcome);
    }

    let connectivity = SessionConnectivity::new();
    let dispatcher = Dispatcher::new(Arc::clone(&session));
    let messaging = &config.messaging;
    let announcement = messaging.connection_message_enabled.then(|| {
        NotificationMessage::new(
            messaging.connection_message.as_str(),
            messaging.channel_id.as_str(),
        )
    });

    let (handler, events) = session_event_channel();
    session.register_event_handler(handler);
    let tracker = ConnectivityTracker::new(connectivity.clone(), dispatcher.clone(), announcement)
        .spawn(events, TRACKER_THREAD_NAME, config.relay.worker_stack_size)
        .map_err(|source| BootError::Spawn {
            name: TRACKER_THREAD_NAME.to_string(),
            source,
        })?;

    if let Err(e) = login_with_retry(
        &*session,
        messaging.login_attempts,
        messaging.login_retry_backoff(),
    ) {
        warn!("Session login gave up: {}", e);
    }

    let (sink, source) = relay(config.relay.queue_capacity);
    let worker = DoorbellWorker::new(
        source,
        connectivity.clone(),
        dispatcher,
        messaging.doorbell_message.as_str(),
        messaging.channel_id.as_str(),
    )
    .spawn(&config.relay.worker_name, config.relay.worker_stack_size)
    .map_err(|source| BootError::Spawn {
        name: config.relay.worker_name.clone(),
        source,
    })?;

    let pin = config.bell.pin_number;
    interrupts
        .install_interrupt_service()
        .map_err(BootError::Interrupt)?;
    interrupts
        .set_interrupt_trigger(pin, Trigger::RisingEdge)
        .map_err(BootError::Interrupt)?;
    let debouncer = Debouncer::new(clock, sink, config.bell.timeout());
    interrupts
        .attach_handler(pin, debouncer.into_handler())
        .map_err(BootError::Interrupt)?;
    info!("Doorbell armed on GPIO{}", pin);

    Ok(RunningDoorbell {
        outcome,
        connectivity,
        link,
        session,
        interrupts,
        worker,
        tracker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSession, FakeStore};

    #[test]
    fn test_healthy_store_initializes_once() {
        let mut store = FakeStore::healthy();
        assert!(init_store(&mut store).is_ok());
        assert_eq!(store.init_calls(), 1);
        assert_eq!(store.erase_calls(), 0);
    }

    #[test]
    fn test_recoverable_store_error_erases_and_retries() {
        for error in [StoreInitError::NoFreePages, StoreInitError::NewVersionFound] {
            let mut store = FakeStore::with_init_results(vec![Err(error)]);
            assert!(init_store(&mut store).is_ok());
            assert_eq!(store.init_calls(), 2);
            assert_eq!(store.erase_calls(), 1);
        }
    }

    #[test]
    fn test_other_store_error_is_fatal() {
        let mut store =
            FakeStore::with_init_results(vec![Err(StoreInitError::Other("flash".to_string()))]);
        assert!(init_store(&mut store).is_err());
        assert_eq!(store.erase_calls(), 0);
    }

    #[test]
    fn test_failure_after_erase_is_fatal() {
        let mut store = FakeStore::with_init_results(vec![
            Err(StoreInitError::NoFreePages),
            Err(StoreInitError::NoFreePages),
        ]);
        assert_eq!(init_store(&mut store), Err(StoreInitError::NoFreePages));
        assert_eq!(store.erase_calls(), 1);
    }

    #[test]
    fn test_failed_erase_is_fatal() {
        let mut store = FakeStore::with_init_results(vec![Err(StoreInitError::NewVersionFound)])
            .failing_erase(StoreInitError::Other("erase".to_string()));
        assert!(init_store(&mut store).is_err());
        assert_eq!(store.init_calls(), 1);
    }

    #[test]
    fn test_login_retries_until_success() {
        let session = FakeSession::new().failing_logins(2);
        assert!(login_with_retry(&session, 3, Duration::ZERO).is_ok());
        assert_eq!(session.login_calls(), 3);
    }

    #[test]
    fn test_login_gives_up_after_attempts() {
        let session = FakeSession::new().failing_logins(5);
        assert!(login_with_retry(&session, 3, Duration::ZERO).is_err());
        assert_eq!(session.login_calls(), 3);
    }

    #[test]
    fn test_login_zero_attempts_still_tries_once() {
        let session = FakeSession::new();
        assert!(login_with_retry(&session, 0, Duration::ZERO).is_ok());
        assert_eq!(session.login_calls(), 1);
    }

    #[test]
    fn test_session_config_from_messaging_section() {
        let mut config = DoorbellConfig::default();
        config.messaging.bot_token = "abc".to_string();
        let session = session_config(&config);
        assert_eq!(session.token, "abc");
        assert_eq!(session.intents, doorbell_hal::INTENT_GUILD_MESSAGES);
    }
}
