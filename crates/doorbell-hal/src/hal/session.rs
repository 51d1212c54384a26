// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Remote messaging session.
//!
//! A session client reports its lifecycle through [`SessionEvent`] values
//! delivered to a registered observer. `login()` only starts the handshake.

use core::fmt;

/// Gateway intent bit for guild message events
pub const INTENT_GUILD_MESSAGES: u32 = 1 << 9;

/// Parameters used when creating a session client
#[derive(Clone)]
pub struct SessionConfig {
    /// Bot authentication token
    pub token: String,
    /// Gateway intents bitmask
    pub intents: u32,
}

impl SessionConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            intents: INTENT_GUILD_MESSAGES,
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("token", &"<redacted>")
            .field("intents", &self.intents)
            .finish()
    }
}

/// Identity of the logged-in bot account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub username: String,
    pub discriminator: String,
}

impl fmt::Display for SessionUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.username, self.discriminator)
    }
}

/// Session lifecycle transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected(SessionUser),
    Disconnected,
}

/// Observer invoked from the session client's event context
pub type SessionEventHandler = Box<dyn Fn(SessionEvent) + Send + Sync + 'static>;

/// A message ready to be posted to one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub content: String,
    pub channel_id: String,
}

impl NotificationMessage {
    pub fn new(content: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// Failure to hand a message to the remote service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service rejected the message with status {status}")]
    Rejected { status: u16 },
}

/// Client for the remote messaging session
///
/// Methods take `&self`: the client is shared between the boot thread, the
/// connectivity tracker and the worker.
pub trait SessionClient: Send + Sync {
    /// Install the lifecycle observer. A later registration replaces the
    /// earlier one.
    fn register_event_handler(&self, handler: SessionEventHandler);

    /// Begin the login handshake; the result arrives as a [`SessionEvent`]
    ///
    /// One attempt per call. Clients do not reconnect on their own: after a
    /// `Disconnected` event the session stays down until `login` is called
    /// again.
    fn login(&self) -> Result<(), TransportError>;

    /// Post `message` to its channel
    fn send_message(&self, message: &NotificationMessage) -> Result<(), TransportError>;
}
