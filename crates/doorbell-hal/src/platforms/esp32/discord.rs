// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Messaging session over the Discord REST API.
//!
//! There is no gateway socket: `login()` validates the token against
//! `/users/@me` and reports `Connected` with the bot identity, and messages
//! are posted to `/channels/{id}/messages`. Each request opens its own TLS
//! connection using the certificate bundle shipped with ESP-IDF.
//!
//! A failed login or a 401 on send reports `Disconnected`, and nothing here
//! logs in again afterwards.

use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use esp_idf_svc::http::Method;
use esp_idf_svc::sys::{self as esp_idf_sys, EspError};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::hal::{
    NotificationMessage, SessionClient, SessionConfig, SessionEvent, SessionEventHandler,
    SessionUser, TransportError,
};

const API_BASE: &str = "https://discord.com/api/v10";
const MAX_RESPONSE_BYTES: usize = 2048;

fn request_error(e: EspError) -> TransportError {
    TransportError::Request(e.to_string())
}

/// Discord bot session
pub struct DiscordSession {
    authorization: String,
    intents: u32,
    handler: Mutex<Option<SessionEventHandler>>,
}

impl DiscordSession {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            authorization: format!("Bot {}", config.token),
            intents: config.intents,
            handler: Mutex::new(None),
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(handler) = self.handler.lock().as_ref() {
            handler(event);
        }
    }

    /// Perform one request and return (status, body)
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<(u16, Vec<u8>), TransportError> {
        let mut connection = EspHttpConnection::new(&Configuration {
            crt_bundle_attach: Some(esp_idf_sys::esp_crt_bundle_attach),
            ..Default::default()
        })
        .map_err(request_error)?;

        let uri = format!("{}{}", API_BASE, path);
        let content_length = body.map_or(0, |b| b.len()).to_string();
        let headers = [
            ("Authorization", self.authorization.as_str()),
            ("Content-Type", "application/json"),
            ("Content-Length", content_length.as_str()),
            ("User-Agent", "DiscordBot (doorbell, 0.1)"),
        ];

        connection
            .initiate_request(method, &uri, &headers)
            .map_err(request_error)?;

        if let Some(mut remaining) = body {
            while !remaining.is_empty() {
                let written = connection.write(remaining).map_err(request_error)?;
                remaining = &remaining[written..];
            }
        }

        connection.initiate_response().map_err(request_error)?;
        let status = connection.status();

        let mut response = Vec::new();
        let mut chunk = [0u8; 256];
        loop {
            let read = connection.read(&mut chunk).map_err(request_error)?;
            if read == 0 || response.len() + read > MAX_RESPONSE_BYTES {
                break;
            }
            response.extend_from_slice(&chunk[..read]);
        }

        Ok((status, response))
    }
}

fn parse_user(body: &[u8]) -> Option<SessionUser> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    Some(SessionUser {
        username: value.get("username")?.as_str()?.to_string(),
        discriminator: value
            .get("discriminator")
            .and_then(|d| d.as_str())
            .unwrap_or("0")
            .to_string(),
    })
}

impl SessionClient for DiscordSession {
    fn register_event_handler(&self, handler: SessionEventHandler) {
        *self.handler.lock() = Some(handler);
    }

    fn login(&self) -> Result<(), TransportError> {
        debug!("Logging in with intents {:#x}", self.intents);
        let (status, body) = match self.request(Method::Get, "/users/@me", None) {
            Ok(response) => response,
            Err(e) => {
                self.emit(SessionEvent::Disconnected);
                return Err(e);
            }
        };

        if status != 200 {
            warn!("Login rejected with status {}", status);
            self.emit(SessionEvent::Disconnected);
            return Err(TransportError::Rejected { status });
        }

        match parse_user(&body) {
            Some(user) => {
                self.emit(SessionEvent::Connected(user));
                Ok(())
            }
            None => {
                self.emit(SessionEvent::Disconnected);
                Err(TransportError::Request("malformed user object".to_string()))
            }
        }
    }

    fn send_message(&self, message: &NotificationMessage) -> Result<(), TransportError> {
        let body = serde_json::json!({ "content": message.content }).to_string();
        let path = format!("/channels/{}/messages", message.channel_id);
        let (status, _) = self.request(Method::Post, &path, Some(body.as_bytes()))?;

        match status {
            200..=299 => Ok(()),
            401 => {
                // Token revoked; the session is gone
                self.emit(SessionEvent::Disconnected);
                Err(TransportError::Rejected { status })
            }
            _ => Err(TransportError::Rejected { status }),
        }
    }
}
