// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Doorbell worker task
//!
//! Drains the relay queue. Each token turns into one send attempt when the
//! session is connected and is discarded otherwise.

use std::io;
use std::thread::{self, JoinHandle};

use doorbell_hal::{NotificationMessage, RingEvent, RingSource, SessionClient};
use tracing::info;

use crate::connectivity::SessionConnectivity;
use crate::dispatch::Dispatcher;

pub struct DoorbellWorker<R, C: ?Sized> {
    source: R,
    connectivity: SessionConnectivity,
    dispatcher: Dispatcher<C>,
    content: String,
    channel_id: String,
}

impl<R, C> DoorbellWorker<R, C>
where
    R: RingSource,
    C: SessionClient + ?Sized,
{
    pub fn new(
        source: R,
        connectivity: SessionConnectivity,
        dispatcher: Dispatcher<C>,
        content: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            connectivity,
            dispatcher,
            content: content.into(),
            channel_id: channel_id.into(),
        }
    }

    /// Process one token. Returns whether a send was attempted.
    pub fn handle(&self, _token: RingEvent) -> bool {
        info!("Doorbell rang");
        if !self.connectivity.is_connected() {
            info!("Session not connected, notification discarded");
            return false;
        }

        let message = NotificationMessage::new(self.content.as_str(), self.channel_id.as_str());
        self.dispatcher.send(&message);
        true
    }

    /// Block on the relay queue forever; returns only once every producer is gone
    pub fn run(self) {
        info!("Doorbell worker started");
        while let Some(token) = self.source.recv() {
            self.handle(token);
        }
        info!("Relay queue closed, doorbell worker exiting");
    }
}

impl<R, C> DoorbellWorker<R, C>
where
    R: RingSource + 'static,
    C: SessionClient + ?Sized + 'static,
{
    /// Start [`run`](Self::run) on a named thread
    pub fn spawn(self, name: &str, stack_size: usize) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(name.to_string())
            .stack_size(stack_size)
            .spawn(move || self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::relay_queue;
    use crate::testing::FakeSession;
    use doorbell_hal::RingSink;
    use std::sync::Arc;

    fn worker(
        session: &Arc<FakeSession>,
        connectivity: &SessionConnectivity,
    ) -> (
        crate::relay::RelayProducer,
        DoorbellWorker<crate::relay::RelayConsumer, FakeSession>,
    ) {
        let (producer, consumer) = relay_queue(10);
        let worker = DoorbellWorker::new(
            consumer,
            connectivity.clone(),
            Dispatcher::new(Arc::clone(session)),
            "Ding dong",
            "42",
        );
        (producer, worker)
    }

    #[test]
    fn test_disconnected_token_never_sends() {
        let session = Arc::new(FakeSession::new());
        let connectivity = SessionConnectivity::new();
        let (_producer, worker) = worker(&session, &connectivity);

        assert!(!worker.handle(RingEvent));
        assert_eq!(session.send_attempts(), 0);
    }

    #[test]
    fn test_connected_token_sends_configured_message() {
        let session = Arc::new(FakeSession::new());
        let connectivity = SessionConnectivity::new();
        connectivity.set_connected(true);
        let (_producer, worker) = worker(&session, &connectivity);

        assert!(worker.handle(RingEvent));
        assert_eq!(session.sent(), vec![NotificationMessage::new("Ding dong", "42")]);
    }

    #[test]
    fn test_send_failure_does_not_stop_worker() {
        let session = Arc::new(FakeSession::new());
        session.fail_sends(true);
        let connectivity = SessionConnectivity::new();
        connectivity.set_connected(true);
        let (producer, worker) = worker(&session, &connectivity);

        for _ in 0..3 {
            producer.try_push(RingEvent).unwrap();
        }
        drop(producer);
        worker.run();

        assert_eq!(session.send_attempts(), 3);
    }

    #[test]
    fn test_spawned_worker_drains_queue() {
        let session = Arc::new(FakeSession::new());
        let connectivity = SessionConnectivity::new();
        connectivity.set_connected(true);
        let (producer, worker) = worker(&session, &connectivity);

        let handle = worker.spawn("test-doorbell-worker", 64 * 1024).unwrap();
        producer.try_push(RingEvent).unwrap();
        producer.try_push(RingEvent).unwrap();
        drop(producer);
        handle.join().unwrap();

        assert_eq!(session.sent().len(), 2);
    }
}
