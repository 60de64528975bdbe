// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Network Message Types
//!
//! Wire protocol types for the chat server: outbound commands, inbound
//! events, server close codes, and the normalized message record handed
//! to room listeners.

use serde::{Deserialize, Serialize};

/// Conversation (chat room) identifier.
pub type RoomId = i64;

/// Client-generated correlation identifier for a pending send.
pub type TempId = String;

/// Commands the client sends to the chat server.
///
/// Encoded as `{ "type": "<variant>", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientCommand {
    /// Post a text message to a room.
    SendMessage(SendMessage),
}

/// Payload of [`ClientCommand::SendMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessage {
    /// Target room.
    pub room_id: RoomId,
    /// Message text.
    pub message: String,
    /// Correlation ID echoed back in the confirmation.
    pub message_temp_id: TempId,
}

/// Events pushed by the chat server.
///
/// Encoded as `{ "type": "<variant>", "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerEvent {
    /// A message was posted to a room we may be listening on.
    MessageReceived(MessageReceived),
    /// Outcome of one of our own sends.
    MessageSentConfirmation(SendConfirmation),
    /// The server is closing the session.
    Disconnection(Disconnection),
}

/// Payload of [`ServerEvent::MessageReceived`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceived {
    /// Room the message belongs to.
    pub room_id: RoomId,
    /// Author of the message.
    pub sender_id: String,
    /// Message text.
    pub message: String,
}

/// Payload of [`ServerEvent::MessageSentConfirmation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendConfirmation {
    /// Whether the server accepted the message.
    pub confirmed: bool,
    /// Rejection reason, informational only.
    #[serde(default)]
    pub reason: Option<String>,
    /// The `message_temp_id` of the send being confirmed.
    pub message_id: TempId,
}

/// Payload of [`ServerEvent::Disconnection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disconnection {
    /// Server close code, see [`CloseCode`].
    pub code: u16,
    /// Free-form reason supplied by the server.
    #[serde(default)]
    pub reason: String,
}

/// Close codes assigned by the chat server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseCode {
    /// 4001
    NoAuthToken,
    /// 4002
    TokenInvalid,
    /// 4003
    InactivityTimeout,
    /// 4004
    AdminDisconnect,
    /// 4005
    Banned,
    /// 4006
    ServerError,
    /// 4007
    ServerShutdown,
    /// 4008
    NewDeviceConnection,
    /// 4009
    ConnectionClosed,
    /// 4010
    BadMessageStructure,
    /// 4011
    HatefulSpeechDetected,
    /// Any code the server protocol does not define.
    Other(u16),
}

impl CloseCode {
    /// Maps a numeric close code.
    pub fn from_u16(code: u16) -> Self {
        match code {
            4001 => CloseCode::NoAuthToken,
            4002 => CloseCode::TokenInvalid,
            4003 => CloseCode::InactivityTimeout,
            4004 => CloseCode::AdminDisconnect,
            4005 => CloseCode::Banned,
            4006 => CloseCode::ServerError,
            4007 => CloseCode::ServerShutdown,
            4008 => CloseCode::NewDeviceConnection,
            4009 => CloseCode::ConnectionClosed,
            4010 => CloseCode::BadMessageStructure,
            4011 => CloseCode::HatefulSpeechDetected,
            other => CloseCode::Other(other),
        }
    }

    /// Returns the numeric close code.
    pub fn as_u16(self) -> u16 {
        match self {
            CloseCode::NoAuthToken => 4001,
            CloseCode::TokenInvalid => 4002,
            CloseCode::InactivityTimeout => 4003,
            CloseCode::AdminDisconnect => 4004,
            CloseCode::Banned => 4005,
            CloseCode::ServerError => 4006,
            CloseCode::ServerShutdown => 4007,
            CloseCode::NewDeviceConnection => 4008,
            CloseCode::ConnectionClosed => 4009,
            CloseCode::BadMessageStructure => 4010,
            CloseCode::HatefulSpeechDetected => 4011,
            CloseCode::Other(code) => code,
        }
    }

    /// Human-readable reason, "Unknown" for codes outside the protocol.
    pub fn description(self) -> &'static str {
        match self {
            CloseCode::NoAuthToken => "No auth token provided",
            CloseCode::TokenInvalid => "Auth token invalid or expired",
            CloseCode::InactivityTimeout => "Closed after inactivity",
            CloseCode::AdminDisconnect => "Disconnected by an administrator",
            CloseCode::Banned => "Account banned",
            CloseCode::ServerError => "Server error",
            CloseCode::ServerShutdown => "Server shutting down",
            CloseCode::NewDeviceConnection => "Connected from another device",
            CloseCode::ConnectionClosed => "Connection closed",
            CloseCode::BadMessageStructure => "Bad message structure",
            CloseCode::HatefulSpeechDetected => "Hateful speech detected",
            CloseCode::Other(_) => "Unknown",
        }
    }

    /// Returns true for server-side conditions where reconnecting is
    /// expected to succeed.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            CloseCode::ServerError | CloseCode::ServerShutdown | CloseCode::ConnectionClosed
        )
    }
}

impl From<u16> for CloseCode {
    fn from(code: u16) -> Self {
        CloseCode::from_u16(code)
    }
}

/// A received chat message as delivered to room listeners.
///
/// The server does not assign an ID or timestamp to `MessageReceived`, so
/// both are generated locally on receipt and are not shared between
/// clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Locally generated message ID (UUID v4).
    pub id: String,
    /// Room the message belongs to.
    pub room_id: RoomId,
    /// Author of the message.
    pub sender_id: String,
    /// Message text.
    pub text: String,
    /// Local receipt time, milliseconds since the Unix epoch.
    pub received_at_ms: u64,
}
