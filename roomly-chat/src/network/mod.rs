//! Network + Transport Layer
//!
//! Wire protocol and transport plumbing for the real-time chat connection.
//!
//! # Architecture
//!
//! The network layer consists of:
//! - **Transport trait**: Platform-agnostic interface for opening a duplex connection
//! - **Message types**: Wire commands, server events, and close codes
//! - **Protocol layer**: JSON encoding and endpoint construction
//! - **WebSocket transport**: Production transport over tokio-tungstenite
//! - **Mock transport**: In-memory transport for tests
//!
//! The session logic (reconnection, pending sends, listener fan-out) lives
//! in [`crate::chat`].

mod error;
mod message;
mod mock;
mod protocol;
mod transport;
mod websocket;

// Error types
pub use error::NetworkError;

// Message types
pub use message::{
    ChatMessage, ClientCommand, CloseCode, Disconnection, MessageReceived, RoomId, SendConfirmation,
    SendMessage, ServerEvent, TempId,
};

// Protocol utilities
pub use protocol::{
    decode_event, encode_command, endpoint_url, new_temp_id, normalize_message, now_millis,
    MAX_MESSAGE_SIZE, TOKEN_QUERY_PARAM,
};

// Transport abstraction
pub use transport::{
    ConnectionState, Outbound, Transport, TransportChannel, TransportEvent, TransportResult,
};

// Mock transport for testing
pub use mock::{MockLink, MockTransport};

// WebSocket transport for production
pub use websocket::WebSocketTransport;
