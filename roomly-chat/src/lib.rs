//! Roomly Chat Library
//!
//! Real-time chat transport for the Roomly client: one authenticated
//! WebSocket session per process, per-send delivery confirmation,
//! per-room message fan-out, and reconnection after transient closes.

pub mod chat;
pub mod network;

pub use chat::{ChatConfig, ChatManager, CredentialProvider, StaticToken, Subscription};
pub use network::{
    ChatMessage, CloseCode, ConnectionState, MockTransport, NetworkError, RoomId, Transport,
    WebSocketTransport,
};
