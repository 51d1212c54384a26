// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use doorbell_hal::{NotificationMessage, SessionClient};
use tracing::{debug, warn};

/// Hands messages to the session client; failures are logged and dropped
pub struct Dispatcher<C: ?Sized> {
    client: Arc<C>,
}

impl<C: ?Sized> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: SessionClient + ?Sized> Dispatcher<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Send once, no retry. Returns whether the client accepted the message.
    pub fn send(&self, message: &NotificationMessage) -> bool {
        match self.client.send_message(message) {
            Ok(()) => {
                debug!("Message sent to channel {}", message.channel_id);
                true
            }
            Err(e) => {
                warn!("Failed to send message to channel {}: {}", message.channel_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeSession;

    #[test]
    fn test_failure_is_swallowed() {
        let session = Arc::new(FakeSession::new());
        session.fail_sends(true);
        let dispatcher = Dispatcher::new(Arc::clone(&session));

        let message = NotificationMessage::new("Ding dong", "42");
        assert!(!dispatcher.send(&message));
        assert_eq!(session.send_attempts(), 1);
        assert!(session.sent().is_empty());
    }

    #[test]
    fn test_success_reaches_client() {
        let session = Arc::new(FakeSession::new());
        let dispatcher = Dispatcher::new(Arc::clone(&session));

        assert!(dispatcher.send(&NotificationMessage::new("Ding dong", "42")));
        assert_eq!(session.sent(), vec![NotificationMessage::new("Ding dong", "42")]);
    }
}
