//! Protocol Layer
//!
//! JSON encoding of commands and events, endpoint construction, and
//! identifier helpers.

use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

use super::error::NetworkError;
use super::message::{ChatMessage, ClientCommand, MessageReceived, ServerEvent, TempId};

/// Maximum inbound frame size accepted by the decoder (1 MB).
pub const MAX_MESSAGE_SIZE: usize = 1_048_576;

/// Query parameter carrying the bearer credential.
pub const TOKEN_QUERY_PARAM: &str = "token";

/// Serializes a client command to a JSON text frame.
pub fn encode_command(command: &ClientCommand) -> Result<String, NetworkError> {
    serde_json::to_string(command).map_err(|e| NetworkError::Serialization(e.to_string()))
}

/// Parses a JSON text frame into a server event.
pub fn decode_event(data: &str) -> Result<ServerEvent, NetworkError> {
    if data.len() > MAX_MESSAGE_SIZE {
        return Err(NetworkError::InvalidMessage(format!(
            "Message too large: {} bytes (max {})",
            data.len(),
            MAX_MESSAGE_SIZE
        )));
    }

    serde_json::from_str(data).map_err(|e| NetworkError::InvalidMessage(e.to_string()))
}

/// Builds the authenticated endpoint: `<server_url>?token=<bearer>`.
///
/// Any query already present on `server_url` is preserved.
pub fn endpoint_url(server_url: &str, token: &str) -> Result<Url, NetworkError> {
    let mut url =
        Url::parse(server_url).map_err(|e| NetworkError::InvalidEndpoint(e.to_string()))?;

    match url.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(NetworkError::InvalidEndpoint(format!(
                "unsupported scheme: {}",
                other
            )))
        }
    }

    url.query_pairs_mut().append_pair(TOKEN_QUERY_PARAM, token);
    Ok(url)
}

/// Generates a fresh temp ID: `temp-<unix millis>-<uuid>`.
pub fn new_temp_id() -> TempId {
    format!("temp-{}-{}", now_millis(), uuid::Uuid::new_v4().simple())
}

/// Normalizes an inbound message, stamping a local ID and receipt time.
pub fn normalize_message(received: MessageReceived) -> ChatMessage {
    ChatMessage {
        id: uuid::Uuid::new_v4().to_string(),
        room_id: received.room_id,
        sender_id: received.sender_id,
        text: received.message,
        received_at_ms: now_millis(),
    }
}

/// Milliseconds since the Unix epoch (0 if the clock is before it).
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
