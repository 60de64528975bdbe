//! Chat Session Layer
//!
//! The connection manager that keeps one live, authenticated connection to
//! the chat server, tracks sends until the server confirms them, fans out
//! incoming messages by room, and reconnects after transient server-side
//! closes.
//!
//! # Example
//!
//! ```ignore
//! use roomly_chat::chat::{self, ChatConfig, ChatManager, StaticToken};
//!
//! let manager = ChatManager::with_websocket(ChatConfig::default(), StaticToken::new(token));
//! if chat::install(manager).is_err() {
//!     // already installed by an earlier startup path
//! }
//! if let Some(chat) = chat::shared() {
//!     chat.connect().await;
//! }
//! ```

mod config;
mod credentials;
mod listeners;
mod manager;
mod pending;
mod shared;

pub use config::ChatConfig;
pub use credentials::{CredentialProvider, StaticToken};
pub use listeners::Subscription;
pub use manager::ChatManager;
pub use shared::{install, shared};
