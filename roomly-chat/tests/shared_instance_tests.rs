//! Tests for chat::shared
//!
//! The process-wide slot can only be filled once per test binary, so the
//! whole lifecycle lives in a single test.

use roomly_chat::chat::{self, ChatConfig, ChatManager, StaticToken};
use roomly_chat::network::MockTransport;

#[test]
fn test_shared_manager_installs_once() {
    assert!(chat::shared().is_none());

    let first = ChatManager::new(
        ChatConfig::new("wss://first.test/ws"),
        MockTransport::new(),
        StaticToken::new("t"),
    );
    let installed = match chat::install(first) {
        Ok(manager) => manager,
        Err(_) => panic!("first install should succeed"),
    };
    assert_eq!(installed.config().server_url, "wss://first.test/ws");

    let second = ChatManager::new(
        ChatConfig::new("wss://second.test/ws"),
        MockTransport::new(),
        StaticToken::new("t"),
    );
    let rejected = match chat::install(second) {
        Ok(_) => panic!("second install should be rejected"),
        Err(rejected) => rejected,
    };
    assert_eq!(rejected.config().server_url, "wss://second.test/ws");

    let shared = chat::shared().expect("manager installed");
    assert_eq!(shared.config().server_url, "wss://first.test/ws");
    assert!(!shared.is_connected());
}
