// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared fixtures for driving a `ChatManager` over the mock transport.

#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use roomly_chat::chat::{ChatConfig, ChatManager, CredentialProvider, StaticToken};
use roomly_chat::network::*;

pub const SERVER_URL: &str = "wss://chat.test/ws";
pub const TOKEN: &str = "test-token";
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

pub fn test_config() -> ChatConfig {
    ChatConfig::new(SERVER_URL)
        .with_send_timeout(SEND_TIMEOUT)
        .with_reconnect_delay(RECONNECT_DELAY)
}

pub fn manager_with(transport: &MockTransport) -> ChatManager {
    ChatManager::new(test_config(), transport.clone(), StaticToken::new(TOKEN))
}

/// Connects a fresh manager and returns the link of its first connection.
pub async fn connected_manager() -> (ChatManager, MockTransport, MockLink) {
    let transport = MockTransport::new();
    let manager = manager_with(&transport);
    manager.connect().await;
    assert!(manager.is_connected());
    let link = transport.last_link().expect("connect should open a link");
    (manager, transport, link)
}

/// Yields to spawned tasks until `condition` holds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

/// Lets spawned tasks drain their queues.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Waits for the next `SendMessage` command written to `link`.
pub async fn next_send(link: &MockLink) -> SendMessage {
    match link.next_outbound().await {
        Some(Outbound::Text(text)) => match decode_command(&text) {
            ClientCommand::SendMessage(send) => send,
        },
        other => panic!("expected a text frame, got {:?}", other),
    }
}

pub fn decode_command(text: &str) -> ClientCommand {
    serde_json::from_str(text).expect("client frame should be a valid command")
}

pub fn confirmation(temp_id: &str, confirmed: bool, reason: Option<&str>) -> ServerEvent {
    ServerEvent::MessageSentConfirmation(SendConfirmation {
        confirmed,
        reason: reason.map(str::to_string),
        message_id: temp_id.to_string(),
    })
}

pub fn incoming(room_id: RoomId, sender_id: &str, text: &str) -> ServerEvent {
    ServerEvent::MessageReceived(MessageReceived {
        room_id,
        sender_id: sender_id.to_string(),
        message: text.to_string(),
    })
}

pub fn disconnection(code: u16, reason: &str) -> ServerEvent {
    ServerEvent::Disconnection(Disconnection {
        code,
        reason: reason.to_string(),
    })
}

/// Credential provider that takes a while to answer.
pub struct SlowToken {
    pub delay: Duration,
}

#[async_trait]
impl CredentialProvider for SlowToken {
    async fn bearer_token(&self) -> Option<String> {
        tokio::time::sleep(self.delay).await;
        Some(TOKEN.to_string())
    }
}
