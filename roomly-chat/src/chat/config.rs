//! Configuration for the chat connection manager

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the chat connection manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// WebSocket endpoint without credentials (e.g., "wss://chat.roomly.app/ws")
    pub server_url: String,

    /// How long a send waits for its confirmation (milliseconds)
    pub send_timeout_ms: u64,

    /// Fixed delay before a reconnect attempt (milliseconds)
    pub reconnect_delay_ms: u64,

    /// WebSocket handshake timeout (milliseconds)
    pub connect_timeout_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            server_url: "wss://chat.roomly.app/ws".to_string(),
            send_timeout_ms: 10_000,
            reconnect_delay_ms: 5_000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl ChatConfig {
    /// Default config pointed at `server_url`
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    /// Set the confirmation timeout for sends
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the reconnect delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the WebSocket handshake timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ChatConfig =
            serde_json::from_str(r#"{"server_url":"wss://chat.test/ws","send_timeout_ms":2500}"#)
                .unwrap();
        assert_eq!(config.server_url, "wss://chat.test/ws");
        assert_eq!(config.send_timeout(), Duration::from_millis(2500));
        assert_eq!(config.reconnect_delay_ms, 5_000);
    }

    #[test]
    fn test_builders() {
        let config = ChatConfig::new("ws://localhost:9000/ws")
            .with_send_timeout(Duration::from_secs(3))
            .with_reconnect_delay(Duration::from_millis(750))
            .with_connect_timeout(Duration::from_secs(1));
        assert_eq!(config.send_timeout_ms, 3_000);
        assert_eq!(config.reconnect_delay_ms, 750);
        assert_eq!(config.connect_timeout_ms, 1_000);
    }
}
