//! CLI Integration Tests
//!
//! Runs the `roomly` binary. None of these reach a chat server.

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_roomly"))
        .env_remove("ROOMLY_TOKEN")
        .env_remove("ROOMLY_CHAT_URL")
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_help_lists_commands() {
    let output = run(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("send"));
    assert!(stdout.contains("listen"));
}

#[test]
fn test_send_without_token_fails() {
    let output = run(&["send", "42", "hello"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ROOMLY_TOKEN"), "stderr: {}", stderr);
}

#[test]
fn test_listen_rejects_bad_server_url() {
    let output = run(&["--server", "https://chat.test/ws", "--token", "t", "listen", "1"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not connect"), "stderr: {}", stderr);
}
