// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Session connectivity tracking.
//!
//! The session client reports lifecycle events through its observer. The
//! observer only forwards them into a channel; a tracker thread applies them
//! to the shared [`SessionConnectivity`] flag and sends the optional
//! connection announcement.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use doorbell_hal::{NotificationMessage, SessionClient, SessionEvent, SessionEventHandler};
use tracing::info;

use crate::dispatch::Dispatcher;

/// Shared "session is established" flag.
///
/// Written only by [`ConnectivityTracker`], read by the worker.
#[derive(Debug, Clone, Default)]
pub struct SessionConnectivity {
    connected: Arc<AtomicBool>,
}

impl SessionConnectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

/// Create the observer to register with the session client, plus the
/// receiving end for the tracker
pub fn session_event_channel() -> (SessionEventHandler, Receiver<SessionEvent>) {
    let (tx, rx): (Sender<SessionEvent>, Receiver<SessionEvent>) = channel::unbounded();
    let handler: SessionEventHandler = Box::new(move |event| {
        let _ = tx.send(event);
    });
    (handler, rx)
}

pub struct ConnectivityTracker<C: ?Sized> {
    connectivity: SessionConnectivity,
    dispatcher: Dispatcher<C>,
    announcement: Option<NotificationMessage>,
}

impl<C: SessionClient + ?Sized> ConnectivityTracker<C> {
    /// `announcement` is sent on every `Connected` event when present
    pub fn new(
        connectivity: SessionConnectivity,
        dispatcher: Dispatcher<C>,
        announcement: Option<NotificationMessage>,
    ) -> Self {
        Self {
            connectivity,
            dispatcher,
            announcement,
        }
    }

    pub fn connectivity(&self) -> &SessionConnectivity {
        &self.connectivity
    }

    pub fn handle_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::Connected(user) => {
                self.connectivity.set_connected(true);
                info!("Bot {} connected", user);
                if let Some(announcement) = &self.announcement {
                    self.dispatcher.send(announcement);
                }
            }
            SessionEvent::Disconnected => {
                self.connectivity.set_connected(false);
                info!("Bot disconnected");
            }
        }
    }

    /// Apply events until every sender is gone
    pub fn run(self, events: Receiver<SessionEvent>) {
        for event in events.iter() {
            self.handle_event(event);
        }
    }
}

impl<C: SessionClient + ?Sized + 'static> ConnectivityTracker<C> {
    pub fn spawn(
        self,
        events: Receiver<SessionEvent>,
        name: &str,
        stack_size: usize,
    ) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(name.to_string())
            .stack_size(stack_size)
            .spawn(move || self.run(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSession;
    use doorbell_hal::SessionUser;

    fn user() -> SessionUser {
        SessionUser {
            username: "porchbot".to_string(),
            discriminator: "0001".to_string(),
        }
    }

    #[test]
    fn test_connected_and_disconnected_toggle_flag() {
        let session = Arc::new(FakeSession::new());
        let tracker =
            ConnectivityTracker::new(SessionConnectivity::new(), Dispatcher::new(session), None);

        assert!(!tracker.connectivity().is_connected());
        tracker.handle_event(SessionEvent::Connected(user()));
        assert!(tracker.connectivity().is_connected());
        tracker.handle_event(SessionEvent::Disconnected);
        assert!(!tracker.connectivity().is_connected());
    }

    #[test]
    fn test_announcement_sent_on_connect_when_enabled() {
        let session = Arc::new(FakeSession::new());
        let announcement = NotificationMessage::new("Doorbell is online.", "42");
        let tracker = ConnectivityTracker::new(
            SessionConnectivity::new(),
            Dispatcher::new(Arc::clone(&session)),
            Some(announcement.clone()),
        );

        tracker.handle_event(SessionEvent::Connected(user()));
        assert_eq!(session.sent(), vec![announcement]);

        tracker.handle_event(SessionEvent::Disconnected);
        assert_eq!(session.send_attempts(), 1);
    }

    #[test]
    fn test_no_announcement_when_disabled() {
        let session = Arc::new(FakeSession::new());
        let tracker = ConnectivityTracker::new(
            SessionConnectivity::new(),
            Dispatcher::new(Arc::clone(&session)),
            None,
        );

        tracker.handle_event(SessionEvent::Connected(user()));
        assert_eq!(session.send_attempts(), 0);
    }

    #[test]
    fn test_run_applies_forwarded_events_in_order() {
        let session = Arc::new(FakeSession::new());
        let connectivity = SessionConnectivity::new();
        let tracker = ConnectivityTracker::new(
            connectivity.clone(),
            Dispatcher::new(Arc::clone(&session)),
            None,
        );

        let (handler, events) = session_event_channel();
        handler(SessionEvent::Connected(user()));
        handler(SessionEvent::Disconnected);
        handler(SessionEvent::Connected(user()));
        drop(handler);

        tracker.run(events);
        assert!(connectivity.is_connected());
    }
}
