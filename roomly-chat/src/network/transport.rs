//! Transport Trait
//!
//! Platform-agnostic abstraction for the chat connection.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::NetworkError;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, NetworkError>;

/// Connection state as seen by the chat manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live transport.
    Disconnected,
    /// Credential fetch or handshake in progress.
    Connecting,
    /// Transport open and ready.
    Connected,
}

/// Frames queued for the transport's writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A JSON text frame.
    Text(String),
    /// Close the connection (client-initiated).
    Close,
}

/// Events surfaced by an open transport, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text payload from the server.
    Message(String),
    /// A transport-level error. The following `Closed` is authoritative.
    Error(String),
    /// The connection closed, with the close frame's code when present.
    Closed {
        /// Close code, if the peer sent one.
        code: Option<u16>,
        /// Close reason text.
        reason: String,
    },
}

/// Handles to an open transport.
///
/// Dropping `outbound` or sending [`Outbound::Close`] shuts the transport
/// down. `events` yields inbound traffic until the transport closes.
#[derive(Debug)]
pub struct TransportChannel {
    /// Writer side.
    pub outbound: mpsc::UnboundedSender<Outbound>,
    /// Reader side.
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

/// Transport trait for the chat connection.
///
/// Abstracts the underlying mechanism (WebSocket in production, an
/// in-memory mock in tests). One call to [`Transport::open`] yields one
/// connection; the chat manager opens a new one on every reconnect.
///
/// # Example
///
/// ```ignore
/// use roomly_chat::network::{Transport, WebSocketTransport};
///
/// let transport = WebSocketTransport::default();
/// let channel = transport.open("wss://chat.example.com/ws?token=abc").await?;
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a connection to `url`.
    ///
    /// Returns once the connection is open, so no inbound event can be
    /// missed by the caller.
    async fn open(&self, url: &str) -> TransportResult<TransportChannel>;
}
