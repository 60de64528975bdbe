//! Mock Transport
//!
//! In-memory implementation of the Transport trait for testing.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::error::NetworkError;
use super::message::ServerEvent;
use super::transport::{Outbound, Transport, TransportChannel, TransportEvent, TransportResult};

/// Mock transport for testing.
///
/// Records every opened URL and hands out a [`MockLink`] per connection so
/// tests can inject server traffic and inspect outbound frames.
///
/// # Example
///
/// ```ignore
/// use roomly_chat::network::MockTransport;
///
/// let transport = MockTransport::new();
/// let channel = transport.open("wss://chat.test/ws?token=t").await?;
///
/// let link = transport.last_link().unwrap();
/// link.push_text("{\"type\":\"Disconnection\",\"data\":{\"code\":4006,\"reason\":\"\"}}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    opened_urls: Vec<String>,
    links: Vec<MockLink>,
    /// Error to return from the next open().
    inject_error: Option<NetworkError>,
}

/// Test-side handle to one mock connection.
#[derive(Debug, Clone)]
pub struct MockLink {
    events: mpsc::UnboundedSender<TransportEvent>,
    outbound: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<Outbound>>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects an error to be returned by the next open().
    pub fn inject_error(&self, error: NetworkError) {
        self.state.lock().inject_error = Some(error);
    }

    /// Number of successful opens.
    pub fn open_count(&self) -> usize {
        self.state.lock().links.len()
    }

    /// URLs passed to open(), including failed attempts.
    pub fn opened_urls(&self) -> Vec<String> {
        self.state.lock().opened_urls.clone()
    }

    /// Handle to the most recently opened connection.
    pub fn last_link(&self) -> Option<MockLink> {
        self.state.lock().links.last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn open(&self, url: &str) -> TransportResult<TransportChannel> {
        let mut state = self.state.lock();
        state.opened_urls.push(url.to_string());
        if let Some(err) = state.inject_error.take() {
            return Err(err);
        }

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        state.links.push(MockLink {
            events: events_tx,
            outbound: Arc::new(tokio::sync::Mutex::new(outbound_rx)),
        });

        Ok(TransportChannel {
            outbound: outbound_tx,
            events: events_rx,
        })
    }
}

impl MockLink {
    /// Delivers a raw text payload as if sent by the server.
    pub fn push_text(&self, text: &str) {
        let _ = self.events.send(TransportEvent::Message(text.to_string()));
    }

    /// Delivers a typed server event.
    pub fn push_event(&self, event: &ServerEvent) {
        if let Ok(text) = serde_json::to_string(event) {
            self.push_text(&text);
        }
    }

    /// Delivers a transport-level error.
    pub fn push_error(&self, reason: &str) {
        let _ = self.events.send(TransportEvent::Error(reason.to_string()));
    }

    /// Closes the connection from the server side.
    pub fn close(&self, code: Option<u16>, reason: &str) {
        let _ = self.events.send(TransportEvent::Closed {
            code,
            reason: reason.to_string(),
        });
    }

    /// Waits for the next frame written by the client.
    ///
    /// Returns `None` once the client dropped its writer.
    pub async fn next_outbound(&self) -> Option<Outbound> {
        self.outbound.lock().await.recv().await
    }

    /// Returns a frame already written by the client without waiting.
    pub async fn try_next_outbound(&self) -> Option<Outbound> {
        self.outbound.lock().await.try_recv().ok()
    }
}
