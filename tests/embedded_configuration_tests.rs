use std::net::Ipv4Addr;
use std::sync::Arc;

use doorbell::prelude::*;
use doorbell::runtime::boot::session_config;
use doorbell::runtime::relay_queue;
use doorbell::runtime::testing::{FakeInterrupts, FakeLink, FakeSession, FakeStore, ManualClock};

#[test]
fn embedded_configuration_is_valid() {
    let config = doorbell::embedded_config().expect("shipped configuration validates");
    assert_eq!(config.bell.pin_number, 4);
    assert_eq!(config.bell.timeout_secs, 5);
    assert_eq!(config.wifi.maximum_retry, 5);
    assert_eq!(config.relay.queue_capacity, 10);
    assert!(!config.messaging.connection_message_enabled);
    assert!(!config.messaging.bot_token.is_empty());
    assert_eq!(config.messaging.login_attempts, 3);
}

#[test]
fn embedded_configuration_boots_with_fakes() {
    let config = doorbell::embedded_config().expect("shipped configuration validates");
    assert_eq!(session_config(&config).intents, 512);

    let running = boot(
        &config,
        BootParts {
            store: FakeStore::healthy(),
            link: FakeLink::connecting(Ipv4Addr::new(192, 168, 4, 2)),
            session: Arc::new(FakeSession::new()),
            interrupts: FakeInterrupts::new(),
            clock: ManualClock::new(),
            relay: relay_queue,
        },
    )
    .expect("boot succeeds");

    assert_eq!(running.outcome(), ConnectionOutcome::Connected);
    assert!(!running.connectivity().is_connected());
}
