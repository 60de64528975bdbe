//! Listen Command
//!
//! Prints messages for one room until interrupted.

use anyhow::{bail, Context, Result};
use roomly_chat::{ChatManager, ChatMessage, RoomId};

use crate::config::CliConfig;

fn format_message(message: &ChatMessage) -> String {
    format!("[{}] {}: {}", message.room_id, message.sender_id, message.text)
}

/// Listens on `room_id` until Ctrl-C.
///
/// Reconnects after transient server closes are handled by the manager.
pub async fn run(config: &CliConfig, room_id: RoomId) -> Result<()> {
    let chat = ChatManager::with_websocket(config.chat_config(), config.credentials()?);

    let _connection = chat.on_connection_change(|connected| {
        if connected {
            eprintln!("connected");
        } else {
            eprintln!("disconnected");
        }
    });
    let _room = chat.on_message_for_room(room_id, |message| {
        println!("{}", format_message(message));
    });

    chat.connect().await;
    if !chat.is_connected() {
        bail!("Could not connect to {}", config.server_url);
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for Ctrl-C")?;
    chat.disconnect();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let message = ChatMessage {
            id: "local".to_string(),
            room_id: 42,
            sender_id: "user-7".to_string(),
            text: "hello".to_string(),
            received_at_ms: 0,
        };
        assert_eq!(format_message(&message), "[42] user-7: hello");
    }
}
