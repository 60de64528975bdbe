//! CLI Configuration

use std::time::Duration;

use anyhow::{bail, Result};
use roomly_chat::{ChatConfig, StaticToken};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Chat server endpoint.
    pub server_url: String,
    /// Bearer token, if one was supplied.
    pub token: Option<String>,
    /// Send confirmation timeout.
    pub send_timeout: Duration,
}

impl CliConfig {
    /// Builds the manager configuration.
    pub fn chat_config(&self) -> ChatConfig {
        ChatConfig::new(&self.server_url).with_send_timeout(self.send_timeout)
    }

    /// Returns the credential provider, failing early when no token is set.
    pub fn credentials(&self) -> Result<StaticToken> {
        match self.token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(StaticToken::new(token)),
            _ => bail!("No token given. Pass --token or set ROOMLY_TOKEN."),
        }
    }
}
