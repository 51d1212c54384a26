// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! One-shot network bring-up.
//!
//! [`BringUpStateMachine`] is the pure transition table: it consumes
//! [`LinkEvent`]s and tells the driver what to do next. No threads, no
//! blocking, so it can be stepped directly in tests.
//!
//! [`BringUpCoordinator`] drives the link layer with it and blocks the
//! caller, with no timeout, until the machine signals an outcome.

use crossbeam::channel;
use doorbell_hal::{LinkEvent, LinkLayer, StationCredentials};
use tracing::{debug, error, info, warn};

use crate::error::BringUpError;

/// Result of one bring-up run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    Connected,
    FailedPermanently,
    /// The event source went away before either signal was raised
    Unexpected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringUpPhase {
    Idle,
    Starting,
    Connecting,
    Connected,
    Failed,
}

impl BringUpPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BringUpPhase::Connected | BringUpPhase::Failed)
    }
}

/// What the driver must do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BringUpAction {
    /// Issue a (fire-and-forget) association request
    Connect,
    /// Wake the waiting caller with this outcome
    Signal(ConnectionOutcome),
}

#[derive(Debug, Clone)]
pub struct BringUpStateMachine {
    max_retries: u32,
    retry_count: u32,
    phase: BringUpPhase,
}

impl BringUpStateMachine {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            retry_count: 0,
            phase: BringUpPhase::Idle,
        }
    }

    pub fn phase(&self) -> BringUpPhase {
        self.phase
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// The station is being started
    pub fn begin(&mut self) {
        if self.phase == BringUpPhase::Idle {
            self.phase = BringUpPhase::Starting;
        }
    }

    /// Advance by one observed link event
    pub fn step(&mut self, event: LinkEvent) -> Option<BringUpAction> {
        if self.phase.is_terminal() {
            return None;
        }

        match event {
            LinkEvent::StationStarted => match self.phase {
                BringUpPhase::Idle | BringUpPhase::Starting => {
                    self.phase = BringUpPhase::Connecting;
                    Some(BringUpAction::Connect)
                }
                _ => None,
            },
            LinkEvent::StationDisconnected { .. } => {
                if self.retry_count < self.max_retries {
                    self.retry_count += 1;
                    self.phase = BringUpPhase::Connecting;
                    Some(BringUpAction::Connect)
                } else {
                    self.phase = BringUpPhase::Failed;
                    Some(BringUpAction::Signal(ConnectionOutcome::FailedPermanently))
                }
            }
            LinkEvent::AddressAcquired { .. } => {
                self.retry_count = 0;
                self.phase = BringUpPhase::Connected;
                Some(BringUpAction::Signal(ConnectionOutcome::Connected))
            }
        }
    }
}

/// Blocking driver for [`BringUpStateMachine`]
pub struct BringUpCoordinator<'a, L: LinkLayer + ?Sized> {
    link: &'a mut L,
}

impl<'a, L: LinkLayer + ?Sized> BringUpCoordinator<'a, L> {
    pub fn new(link: &'a mut L) -> Self {
        Self { link }
    }

    /// Associate with `ssid` using the default WPA2-Personal threshold
    pub fn bring_up(
        &mut self,
        ssid: &str,
        password: &str,
        max_retries: u32,
    ) -> Result<ConnectionOutcome, BringUpError> {
        let credentials = StationCredentials::new(ssid, password)?;
        self.bring_up_with(&credentials, max_retries)
    }

    /// Run bring-up to completion and return the outcome.
    ///
    /// Blocks until the link layer reports an address, the retry budget is
    /// exhausted, or the event source disappears.
    pub fn bring_up_with(
        &mut self,
        credentials: &StationCredentials,
        max_retries: u32,
    ) -> Result<ConnectionOutcome, BringUpError> {
        let (tx, rx) = channel::unbounded::<LinkEvent>();
        let handler_id = self.link.register_handler(Box::new(move |event| {
            // The receiver is gone once bring-up has finished
            let _ = tx.send(event);
        }))?;

        let mut machine = BringUpStateMachine::new(max_retries);
        machine.begin();

        if let Err(e) = self.configure_and_start(credentials) {
            self.release(handler_id);
            return Err(e);
        }
        info!("Station started, waiting for association");

        let outcome = loop {
            let event = match rx.recv() {
                Ok(event) => event,
                Err(_) => break ConnectionOutcome::Unexpected,
            };
            debug!("Link event: {:?}", event);

            match machine.step(event) {
                Some(BringUpAction::Connect) => {
                    if machine.retry_count() > 0 {
                        info!(
                            "Retrying association ({}/{})",
                            machine.retry_count(),
                            machine.max_retries()
                        );
                    }
                    if let Err(e) = self.link.connect() {
                        warn!("Connect request failed: {}", e);
                    }
                }
                Some(BringUpAction::Signal(outcome)) => {
                    if let LinkEvent::AddressAcquired { ip } = event {
                        info!("Got IP: {}", ip);
                    }
                    break outcome;
                }
                None => {}
            }
        };

        self.release(handler_id);

        match outcome {
            ConnectionOutcome::Connected => {
                info!("Connected to access point SSID: {}", credentials.ssid)
            }
            ConnectionOutcome::FailedPermanently => {
                error!("Failed to connect to SSID: {}", credentials.ssid)
            }
            ConnectionOutcome::Unexpected => error!("Link event source closed unexpectedly"),
        }

        Ok(outcome)
    }

    fn configure_and_start(&mut self, credentials: &StationCredentials) -> Result<(), BringUpError> {
        self.link.set_station_mode()?;
        self.link.set_credentials(credentials)?;
        self.link.start()?;
        Ok(())
    }

    fn release(&mut self, handler_id: doorbell_hal::HandlerId) {
        if let Err(e) = self.link.unregister_handler(handler_id) {
            warn!("Failed to unregister link event handler: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const DISCONNECTED: LinkEvent = LinkEvent::StationDisconnected { reason: 201 };

    fn acquired() -> LinkEvent {
        LinkEvent::AddressAcquired {
            ip: Ipv4Addr::new(192, 168, 1, 40),
        }
    }

    #[test]
    fn test_station_start_requests_connect() {
        let mut sm = BringUpStateMachine::new(5);
        assert_eq!(sm.phase(), BringUpPhase::Idle);

        sm.begin();
        assert_eq!(sm.phase(), BringUpPhase::Starting);

        assert_eq!(
            sm.step(LinkEvent::StationStarted),
            Some(BringUpAction::Connect)
        );
        assert_eq!(sm.phase(), BringUpPhase::Connecting);
    }

    #[test]
    fn test_retries_until_budget_exhausted() {
        let mut sm = BringUpStateMachine::new(2);
        sm.begin();
        sm.step(LinkEvent::StationStarted);

        assert_eq!(sm.step(DISCONNECTED), Some(BringUpAction::Connect));
        assert_eq!(sm.retry_count(), 1);
        assert_eq!(sm.step(DISCONNECTED), Some(BringUpAction::Connect));
        assert_eq!(sm.retry_count(), 2);
        assert_eq!(
            sm.step(DISCONNECTED),
            Some(BringUpAction::Signal(ConnectionOutcome::FailedPermanently))
        );
        assert_eq!(sm.phase(), BringUpPhase::Failed);
        assert_eq!(sm.retry_count(), 2);
    }

    #[test]
    fn test_zero_retries_fails_on_first_disconnect() {
        let mut sm = BringUpStateMachine::new(0);
        sm.begin();
        sm.step(LinkEvent::StationStarted);

        assert_eq!(
            sm.step(DISCONNECTED),
            Some(BringUpAction::Signal(ConnectionOutcome::FailedPermanently))
        );
    }

    #[test]
    fn test_address_resets_retry_count() {
        let mut sm = BringUpStateMachine::new(5);
        sm.begin();
        sm.step(LinkEvent::StationStarted);
        sm.step(DISCONNECTED);
        sm.step(DISCONNECTED);
        assert_eq!(sm.retry_count(), 2);

        assert_eq!(
            sm.step(acquired()),
            Some(BringUpAction::Signal(ConnectionOutcome::Connected))
        );
        assert_eq!(sm.retry_count(), 0);
        assert_eq!(sm.phase(), BringUpPhase::Connected);
    }

    #[test]
    fn test_terminal_phases_ignore_events() {
        let mut sm = BringUpStateMachine::new(0);
        sm.begin();
        sm.step(LinkEvent::StationStarted);
        sm.step(DISCONNECTED);
        assert_eq!(sm.phase(), BringUpPhase::Failed);

        assert_eq!(sm.step(acquired()), None);
        assert_eq!(sm.step(LinkEvent::StationStarted), None);
        assert_eq!(sm.phase(), BringUpPhase::Failed);
    }
}
