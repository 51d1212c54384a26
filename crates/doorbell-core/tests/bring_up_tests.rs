use std::net::Ipv4Addr;

use doorbell_core::testing::{ConnectResponse, FakeLink};
use doorbell_core::{
    BringUpAction, BringUpCoordinator, BringUpError, BringUpPhase, BringUpStateMachine,
    ConnectionOutcome,
};
use doorbell_hal::{AuthThreshold, LinkEvent};

const SSID: &str = "porch";
const PASSWORD: &str = "correct horse";

fn ip() -> Ipv4Addr {
    Ipv4Addr::new(10, 0, 0, 17)
}

#[test]
fn permanent_disconnection_makes_n_plus_one_attempts() {
    for max_retries in [0u32, 1, 5] {
        let mut link = FakeLink::new();
        let outcome = BringUpCoordinator::new(&mut link)
            .bring_up(SSID, PASSWORD, max_retries)
            .expect("bring-up runs");

        assert_eq!(outcome, ConnectionOutcome::FailedPermanently);
        assert_eq!(link.connect_calls(), max_retries + 1);
    }
}

#[test]
fn success_on_fourth_attempt_connects() {
    let mut link = FakeLink::with_responses(vec![
        ConnectResponse::Disconnect,
        ConnectResponse::Disconnect,
        ConnectResponse::Disconnect,
        ConnectResponse::AcquireAddress(ip()),
    ]);

    let outcome = BringUpCoordinator::new(&mut link)
        .bring_up(SSID, PASSWORD, 3)
        .expect("bring-up runs");

    assert_eq!(outcome, ConnectionOutcome::Connected);
    assert_eq!(link.connect_calls(), 4);
}

#[test]
fn state_machine_resets_retry_count_after_late_success() {
    let mut sm = BringUpStateMachine::new(3);
    sm.begin();
    let mut connects = 0;
    let mut events = vec![LinkEvent::StationStarted];
    events.extend([LinkEvent::StationDisconnected { reason: 15 }; 3]);

    for event in events {
        if sm.step(event) == Some(BringUpAction::Connect) {
            connects += 1;
        }
    }
    assert_eq!(connects, 4);
    assert_eq!(sm.retry_count(), 3);

    let action = sm.step(LinkEvent::AddressAcquired { ip: ip() });
    assert_eq!(
        action,
        Some(BringUpAction::Signal(ConnectionOutcome::Connected))
    );
    assert_eq!(sm.retry_count(), 0);
    assert_eq!(sm.phase(), BringUpPhase::Connected);
}

#[test]
fn immediate_success_configures_station() {
    let mut link = FakeLink::connecting(ip());
    let outcome = BringUpCoordinator::new(&mut link)
        .bring_up(SSID, PASSWORD, 5)
        .expect("bring-up runs");

    assert_eq!(outcome, ConnectionOutcome::Connected);
    assert!(link.station_mode());
    let credentials = link.credentials().expect("credentials applied");
    assert_eq!(credentials.ssid.as_str(), SSID);
    assert_eq!(credentials.auth_threshold, AuthThreshold::Wpa2Personal);
}

#[test]
fn handlers_are_unregistered_after_bring_up() {
    let mut link = FakeLink::connecting(ip());
    BringUpCoordinator::new(&mut link)
        .bring_up(SSID, PASSWORD, 5)
        .expect("bring-up runs");

    assert_eq!(link.registered_handlers(), 0);
    assert_eq!(link.unregistered().len(), 1);
}

#[test]
fn closed_event_source_is_unexpected() {
    let mut link = FakeLink::with_responses(vec![ConnectResponse::CloseEventSource]);
    let outcome = BringUpCoordinator::new(&mut link)
        .bring_up(SSID, PASSWORD, 5)
        .expect("bring-up runs");

    assert_eq!(outcome, ConnectionOutcome::Unexpected);
}

#[test]
fn start_failure_is_an_error_and_releases_handler() {
    let mut link = FakeLink::new().failing_start();
    let result = BringUpCoordinator::new(&mut link).bring_up(SSID, PASSWORD, 5);

    assert!(matches!(result, Err(BringUpError::Link(_))));
    assert_eq!(link.connect_calls(), 0);
    assert_eq!(link.registered_handlers(), 0);
}

#[test]
fn oversized_ssid_is_rejected_before_touching_the_link() {
    let mut link = FakeLink::new();
    let ssid = "x".repeat(40);
    let result = BringUpCoordinator::new(&mut link).bring_up(&ssid, PASSWORD, 5);

    assert!(matches!(result, Err(BringUpError::Credentials(_))));
    assert!(!link.station_mode());
}
