//! Process-wide chat manager.
//!
//! UI call sites share one connection. The application installs the
//! manager once at startup; tests construct their own instances instead.

use once_cell::sync::OnceCell;

use super::manager::ChatManager;

static SHARED: OnceCell<ChatManager> = OnceCell::new();

/// Installs the process-wide manager.
///
/// Fails with the rejected manager if one is already installed.
pub fn install(manager: ChatManager) -> Result<&'static ChatManager, ChatManager> {
    SHARED
        .try_insert(manager)
        .map_err(|(_existing, rejected)| rejected)
}

/// Returns the process-wide manager, if installed.
pub fn shared() -> Option<&'static ChatManager> {
    SHARED.get()
}
