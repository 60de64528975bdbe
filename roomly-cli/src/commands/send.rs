//! Send Command
//!
//! Posts one message and waits for the server's confirmation.

use anyhow::{bail, Result};
use roomly_chat::{ChatManager, RoomId};

use crate::config::CliConfig;

/// Sends `text` to `room_id`. Fails unless the server confirms it.
pub async fn run(config: &CliConfig, room_id: RoomId, text: &str) -> Result<()> {
    let chat = ChatManager::with_websocket(config.chat_config(), config.credentials()?);

    chat.connect().await;
    if !chat.is_connected() {
        bail!("Could not connect to {}", config.server_url);
    }

    let confirmed = chat.send_message(room_id, text).await;
    chat.disconnect();

    if !confirmed {
        bail!("Message to room {} was not confirmed", room_id);
    }
    println!("Message delivered to room {}", room_id);
    Ok(())
}
