//! Bearer credential source for the connection handshake.

use async_trait::async_trait;

/// Supplies the bearer token used to authenticate a connection.
///
/// Called once per connection attempt, including reconnects, so a
/// refreshed token is picked up automatically.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the current token, or `None` when the user is signed out.
    async fn bearer_token(&self) -> Option<String>;
}

/// Fixed token, for the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        StaticToken(Some(token.into()))
    }

    /// A provider that never has a token.
    pub fn none() -> Self {
        StaticToken(None)
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
