// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! WebSocket Transport
//!
//! Real transport implementation using tokio-tungstenite.
//! The TLS backend (rustls or native-tls) is selected by crate features.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::error::NetworkError;
use super::transport::{Outbound, Transport, TransportChannel, TransportEvent, TransportResult};

/// Default handshake timeout in milliseconds.
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// WebSocket transport for the chat server.
///
/// Supports both ws:// (plaintext) and wss:// (TLS) endpoints. Each
/// [`Transport::open`] spawns one reader and one writer task that live as
/// long as the socket.
///
/// # Example
///
/// ```ignore
/// use roomly_chat::network::{Transport, WebSocketTransport};
///
/// let transport = WebSocketTransport::new(Duration::from_secs(5));
/// let channel = transport.open("wss://chat.example.com/ws?token=abc").await?;
/// ```
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    connect_timeout: Duration,
}

impl WebSocketTransport {
    /// Creates a transport with the given handshake timeout.
    pub fn new(connect_timeout: Duration) -> Self {
        WebSocketTransport { connect_timeout }
    }

    /// Returns the handshake timeout.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS))
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn open(&self, url: &str) -> TransportResult<TransportChannel> {
        let (socket, _response) = tokio::time::timeout(self.connect_timeout, connect_async(url))
            .await
            .map_err(|_| NetworkError::Timeout)?
            .map_err(|e| {
                NetworkError::ConnectionFailed(format!("WebSocket handshake failed: {}", e))
            })?;

        let (mut sink, mut stream) = socket.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Outbound>();
        let (events_tx, events_rx) = mpsc::unbounded_channel::<TransportEvent>();

        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                match frame {
                    Outbound::Text(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            tracing::debug!(error = %e, "websocket write failed");
                            break;
                        }
                    }
                    Outbound::Close => break,
                }
            }
            // Sends a close frame; errors mean the peer is already gone
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            loop {
                let event = match stream.next().await {
                    Some(Ok(message)) => match classify_frame(message) {
                        Some(event) => event,
                        None => continue,
                    },
                    Some(Err(e)) => {
                        let reason = e.to_string();
                        let _ = events_tx.send(TransportEvent::Error(reason.clone()));
                        TransportEvent::Closed { code: None, reason }
                    }
                    None => TransportEvent::Closed {
                        code: None,
                        reason: "stream ended".into(),
                    },
                };

                let closed = matches!(event, TransportEvent::Closed { .. });
                if events_tx.send(event).is_err() || closed {
                    break;
                }
            }
        });

        Ok(TransportChannel {
            outbound: outbound_tx,
            events: events_rx,
        })
    }
}

/// Maps a WebSocket frame to a transport event.
///
/// Control frames (ping/pong/raw) yield `None`; tungstenite answers pings
/// itself on the next read.
fn classify_frame(message: Message) -> Option<TransportEvent> {
    match message {
        Message::Text(text) => Some(TransportEvent::Message(text)),
        Message::Binary(data) => match String::from_utf8(data) {
            Ok(text) => Some(TransportEvent::Message(text)),
            Err(_) => Some(TransportEvent::Error("non UTF-8 binary frame".into())),
        },
        Message::Close(frame) => Some(match frame {
            Some(frame) => TransportEvent::Closed {
                code: Some(u16::from(frame.code)),
                reason: frame.reason.into_owned(),
            },
            None => TransportEvent::Closed {
                code: None,
                reason: String::new(),
            },
        }),
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => None,
    }
}
