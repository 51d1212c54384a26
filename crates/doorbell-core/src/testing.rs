// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory HAL implementations for tests.
//!
//! Every fake is deterministic and synchronous: link events fire from inside
//! `start()`/`connect()`, session events from inside `login()` or
//! [`FakeSession::emit`], and edges from [`FakeInterrupts::fire`].

use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use doorbell_hal::{
    ConfigStore, EdgeHandler, EdgeInterruptProvider, HalError, HalResult, HandlerId, LinkEvent,
    LinkEventHandler, LinkLayer, NotificationMessage, PinNumber, SessionClient, SessionEvent,
    SessionEventHandler, SessionUser, StationCredentials, StoreInitError, TimeProvider,
    TransportError, Trigger,
};
use parking_lot::Mutex;

use crate::debounce::saturating_micros;

/// Clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_us: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, since_boot: Duration) {
        self.now_us.store(saturating_micros(since_boot), Ordering::Relaxed);
    }

    pub fn advance(&self, by: Duration) {
        let by_us = saturating_micros(by);
        let _ = self
            .now_us
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |now| {
                Some(now.saturating_add(by_us))
            });
    }
}

impl TimeProvider for ManualClock {
    fn get_time_us(&self) -> u64 {
        self.now_us.load(Ordering::Relaxed)
    }
}

/// Configuration store with scripted `init()` results
#[derive(Debug, Default)]
pub struct FakeStore {
    init_results: VecDeque<Result<(), StoreInitError>>,
    erase_result: Option<StoreInitError>,
    init_calls: usize,
    erase_calls: usize,
}

impl FakeStore {
    pub fn healthy() -> Self {
        Self::default()
    }

    /// `init()` returns these in order, then `Ok(())`
    pub fn with_init_results(results: Vec<Result<(), StoreInitError>>) -> Self {
        Self {
            init_results: results.into(),
            ..Self::default()
        }
    }

    pub fn failing_erase(mut self, error: StoreInitError) -> Self {
        self.erase_result = Some(error);
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls
    }

    pub fn erase_calls(&self) -> usize {
        self.erase_calls
    }
}

impl ConfigStore for FakeStore {
    fn init(&mut self) -> Result<(), StoreInitError> {
        self.init_calls += 1;
        self.init_results.pop_front().unwrap_or(Ok(()))
    }

    fn erase(&mut self) -> Result<(), StoreInitError> {
        self.erase_calls += 1;
        match &self.erase_result {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// How [`FakeLink`] reacts to one `connect()` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectResponse {
    Disconnect,
    AcquireAddress(Ipv4Addr),
    /// Emit nothing
    Silent,
    /// Drop every registered handler, as if the event loop went away
    CloseEventSource,
}

/// Link layer driven by a script of connect responses
pub struct FakeLink {
    handlers: Vec<(HandlerId, LinkEventHandler)>,
    next_id: u32,
    responses: VecDeque<ConnectResponse>,
    default_response: ConnectResponse,
    fail_start: bool,
    station_mode: bool,
    credentials: Option<StationCredentials>,
    connect_calls: u32,
    unregistered: Vec<HandlerId>,
}

impl FakeLink {
    /// Link whose every connect attempt is answered with a disconnect
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 1,
            responses: VecDeque::new(),
            default_response: ConnectResponse::Disconnect,
            fail_start: false,
            station_mode: false,
            credentials: None,
            connect_calls: 0,
            unregistered: Vec::new(),
        }
    }

    /// Answer the first connect attempts with `responses`, then disconnect
    pub fn with_responses(responses: Vec<ConnectResponse>) -> Self {
        Self {
            responses: responses.into(),
            ..Self::new()
        }
    }

    /// Associate on the first connect attempt
    pub fn connecting(ip: Ipv4Addr) -> Self {
        Self::with_responses(vec![ConnectResponse::AcquireAddress(ip)])
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn connect_calls(&self) -> u32 {
        self.connect_calls
    }

    pub fn registered_handlers(&self) -> usize {
        self.handlers.len()
    }

    pub fn unregistered(&self) -> &[HandlerId] {
        &self.unregistered
    }

    pub fn station_mode(&self) -> bool {
        self.station_mode
    }

    pub fn credentials(&self) -> Option<&StationCredentials> {
        self.credentials.as_ref()
    }

    pub fn emit(&self, event: LinkEvent) {
        for (_, handler) in &self.handlers {
            handler(event);
        }
    }
}

impl Default for FakeLink {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkLayer for FakeLink {
    fn set_station_mode(&mut self) -> HalResult<()> {
        self.station_mode = true;
        Ok(())
    }

    fn set_credentials(&mut self, credentials: &StationCredentials) -> HalResult<()> {
        self.credentials = Some(credentials.clone());
        Ok(())
    }

    fn start(&mut self) -> HalResult<()> {
        if self.fail_start {
            return Err(HalError::driver("esp_wifi_start", "radio disabled"));
        }
        self.emit(LinkEvent::StationStarted);
        Ok(())
    }

    fn connect(&mut self) -> HalResult<()> {
        self.connect_calls += 1;
        let response = self
            .responses
            .pop_front()
            .unwrap_or(self.default_response);

        match response {
            ConnectResponse::Disconnect => {
                self.emit(LinkEvent::StationDisconnected { reason: 201 })
            }
            ConnectResponse::AcquireAddress(ip) => self.emit(LinkEvent::AddressAcquired { ip }),
            ConnectResponse::Silent => {}
            ConnectResponse::CloseEventSource => self.handlers.clear(),
        }
        Ok(())
    }

    fn register_handler(&mut self, handler: LinkEventHandler) -> HalResult<HandlerId> {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        Ok(id)
    }

    fn unregister_handler(&mut self, id: HandlerId) -> HalResult<()> {
        let position = self
            .handlers
            .iter()
            .position(|(registered, _)| *registered == id)
            .ok_or(HalError::UnknownHandler(id.0))?;
        self.handlers.remove(position);
        self.unregistered.push(id);
        Ok(())
    }
}

/// Session client that records every message it is asked to send
#[derive(Default)]
pub struct FakeSession {
    handler: Mutex<Option<SessionEventHandler>>,
    login_user: Option<SessionUser>,
    sent: Mutex<Vec<NotificationMessage>>,
    send_attempts: AtomicUsize,
    login_calls: AtomicUsize,
    login_failures: AtomicUsize,
    fail_sends: AtomicBool,
}

impl FakeSession {
    /// Session whose login never completes
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose login immediately reports `Connected(user)`
    pub fn with_user(username: &str, discriminator: &str) -> Self {
        Self {
            login_user: Some(SessionUser {
                username: username.to_string(),
                discriminator: discriminator.to_string(),
            }),
            ..Self::default()
        }
    }

    /// The next `count` logins fail and report `Disconnected`
    pub fn failing_logins(self, count: usize) -> Self {
        self.login_failures.store(count, Ordering::Relaxed);
        self
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::Relaxed);
    }

    /// Deliver `event` to the registered observer
    pub fn emit(&self, event: SessionEvent) {
        if let Some(handler) = self.handler.lock().as_ref() {
            handler(event);
        }
    }

    pub fn has_handler(&self) -> bool {
        self.handler.lock().is_some()
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().clone()
    }

    pub fn send_attempts(&self) -> usize {
        self.send_attempts.load(Ordering::Relaxed)
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::Relaxed)
    }
}

impl SessionClient for FakeSession {
    fn register_event_handler(&self, handler: SessionEventHandler) {
        *self.handler.lock() = Some(handler);
    }

    fn login(&self) -> Result<(), TransportError> {
        self.login_calls.fetch_add(1, Ordering::Relaxed);
        let failed = self
            .login_failures
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            self.emit(SessionEvent::Disconnected);
            return Err(TransportError::Request("login timed out".to_string()));
        }
        if let Some(user) = &self.login_user {
            self.emit(SessionEvent::Connected(user.clone()));
        }
        Ok(())
    }

    fn send_message(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        self.send_attempts.fetch_add(1, Ordering::Relaxed);
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(TransportError::Request("connection reset".to_string()));
        }
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

/// Edge interrupt provider fired by hand
#[derive(Default)]
pub struct FakeInterrupts {
    service_installed: bool,
    fail_install: bool,
    triggers: HashMap<PinNumber, Trigger>,
    handlers: HashMap<PinNumber, EdgeHandler>,
}

impl FakeInterrupts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_install() -> Self {
        Self {
            fail_install: true,
            ..Self::default()
        }
    }

    pub fn service_installed(&self) -> bool {
        self.service_installed
    }

    pub fn trigger(&self, pin: PinNumber) -> Option<Trigger> {
        self.triggers.get(&pin).copied()
    }

    /// Simulate one edge on `pin`. Returns whether a handler ran.
    pub fn fire(&mut self, pin: PinNumber) -> bool {
        match self.handlers.get_mut(&pin) {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }
}

impl EdgeInterruptProvider for FakeInterrupts {
    fn install_interrupt_service(&mut self) -> HalResult<()> {
        if self.fail_install {
            return Err(HalError::driver("gpio_install_isr_service", "already in use"));
        }
        self.service_installed = true;
        Ok(())
    }

    fn set_interrupt_trigger(&mut self, pin: PinNumber, trigger: Trigger) -> HalResult<()> {
        if pin < 0 {
            return Err(HalError::InvalidArgument(format!("GPIO{}", pin)));
        }
        self.triggers.insert(pin, trigger);
        Ok(())
    }

    fn attach_handler(&mut self, pin: PinNumber, handler: EdgeHandler) -> HalResult<()> {
        if !self.service_installed {
            return Err(HalError::driver(
                "gpio_isr_handler_add",
                "interrupt service not installed",
            ));
        }
        self.handlers.insert(pin, handler);
        Ok(())
    }
}
