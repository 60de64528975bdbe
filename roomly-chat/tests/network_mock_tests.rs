//! Tests for network::mock
//! Exercises the mock transport the manager tests rely on.

use roomly_chat::network::*;

#[tokio::test]
async fn test_mock_open_records_url() {
    let transport = MockTransport::new();
    assert_eq!(transport.open_count(), 0);
    assert!(transport.last_link().is_none());

    let _channel = transport.open("wss://chat.test/ws?token=t").await.unwrap();

    assert_eq!(transport.open_count(), 1);
    assert_eq!(transport.opened_urls(), vec!["wss://chat.test/ws?token=t"]);
    assert!(transport.last_link().is_some());
}

#[tokio::test]
async fn test_mock_injected_error_applies_once() {
    let transport = MockTransport::new();
    transport.inject_error(NetworkError::Timeout);

    let result = transport.open("wss://chat.test/ws").await;
    assert!(matches!(result, Err(NetworkError::Timeout)));
    assert_eq!(transport.open_count(), 0);
    assert_eq!(transport.opened_urls().len(), 1);

    assert!(transport.open("wss://chat.test/ws").await.is_ok());
    assert_eq!(transport.open_count(), 1);
}

#[tokio::test]
async fn test_mock_link_delivers_server_traffic() {
    let transport = MockTransport::new();
    let mut channel = transport.open("wss://chat.test/ws").await.unwrap();
    let link = transport.last_link().unwrap();

    let event = ServerEvent::Disconnection(Disconnection {
        code: 4007,
        reason: "maintenance".to_string(),
    });
    link.push_event(&event);
    link.push_text("raw");
    link.push_error("reset");
    link.close(Some(4009), "bye");

    match channel.events.recv().await {
        Some(TransportEvent::Message(text)) => assert_eq!(decode_event(&text).unwrap(), event),
        other => panic!("Expected Message, got {:?}", other),
    }
    assert_eq!(
        channel.events.recv().await,
        Some(TransportEvent::Message("raw".to_string()))
    );
    assert_eq!(
        channel.events.recv().await,
        Some(TransportEvent::Error("reset".to_string()))
    );
    assert_eq!(
        channel.events.recv().await,
        Some(TransportEvent::Closed {
            code: Some(4009),
            reason: "bye".to_string(),
        })
    );
}

#[tokio::test]
async fn test_mock_link_captures_client_frames() {
    let transport = MockTransport::new();
    let channel = transport.open("wss://chat.test/ws").await.unwrap();
    let link = transport.last_link().unwrap();

    assert_eq!(link.try_next_outbound().await, None);

    channel.outbound.send(Outbound::Text("frame".to_string())).unwrap();
    channel.outbound.send(Outbound::Close).unwrap();

    assert_eq!(
        link.next_outbound().await,
        Some(Outbound::Text("frame".to_string()))
    );
    assert_eq!(link.try_next_outbound().await, Some(Outbound::Close));

    drop(channel);
    assert_eq!(link.next_outbound().await, None);
}

#[tokio::test]
async fn test_mock_each_open_gets_its_own_link() {
    let transport = MockTransport::new();
    let first = transport.open("wss://chat.test/ws").await.unwrap();
    let first_link = transport.last_link().unwrap();
    let _second = transport.open("wss://chat.test/ws").await.unwrap();

    assert_eq!(transport.open_count(), 2);

    first.outbound.send(Outbound::Close).unwrap();
    assert_eq!(first_link.try_next_outbound().await, Some(Outbound::Close));
    assert_eq!(
        transport.last_link().unwrap().try_next_outbound().await,
        None
    );
}
