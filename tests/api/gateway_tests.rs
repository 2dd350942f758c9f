//! WebSocket Gateway Endpoint Tests
//!
//! Full-transport tests: real WebSocket clients against the `/gateway`
//! route, exercising connect-time query parameters, the join sequence and
//! the signaling relay end to end.

use axum_test::TestServer;
use serde_json::Value;

use crate::common::TestApp;

fn ws_server(app: &TestApp) -> TestServer {
    TestServer::builder()
        .http_transport()
        .build(app.router())
        .unwrap()
}

#[tokio::test]
async fn test_call_join_sequence_over_websocket() {
    let app = TestApp::new();
    let server = ws_server(&app);

    let mut alice = server
        .get_websocket("/gateway?email=alice@x&call=room-1")
        .await
        .into_websocket()
        .await;

    let mut bob = server
        .get_websocket("/gateway?email=bob@y&call=room-1")
        .await
        .into_websocket()
        .await;

    // Bob first learns who is present, then their toggle state
    let first: Value = serde_json::from_str(&bob.receive_text().await).unwrap();
    assert_eq!(first["event"], "existing-user");
    let alice_id = first["data"].as_str().unwrap().to_string();

    let second: Value = serde_json::from_str(&bob.receive_text().await).unwrap();
    assert_eq!(second["event"], "toggle-video");
    assert_eq!(second["data"]["userId"], alice_id);
    assert_eq!(second["data"]["enabled"], false);

    // Alice hears the announcement and learns Bob's connection id from it
    let announced: Value = serde_json::from_str(&alice.receive_text().await).unwrap();
    assert_eq!(announced["event"], "user-connected");
    let bob_id = announced["data"].as_str().unwrap().to_string();

    // Alice sends Bob an offer; it arrives tagged with Alice's id
    alice
        .send_text(format!(
            r#"{{"event":"offer","data":{{"payload":{{"sdp":"v=0"}},"to":"{bob_id}"}}}}"#
        ))
        .await;
    let offer: Value = serde_json::from_str(&bob.receive_text().await).unwrap();
    assert_eq!(offer["event"], "offer");
    assert_eq!(offer["data"]["from"], alice_id);
    assert_eq!(offer["data"]["payload"]["sdp"], "v=0");

    // Bob leaving is broadcast to Alice
    bob.close().await;
    let departed: Value = serde_json::from_str(&alice.receive_text().await).unwrap();
    assert_eq!(departed["event"], "user-disconnected");
    assert_eq!(departed["data"], bob_id.as_str());
}

#[tokio::test]
async fn test_connection_without_query_is_accepted() {
    let app = TestApp::new();
    let server = ws_server(&app);

    // Anonymous, roomless connection: accepted, registered nowhere
    let _socket = server
        .get_websocket("/gateway")
        .await
        .into_websocket()
        .await;

    // Connection registration happens inside the upgrade task; poll briefly
    for _ in 0..50 {
        if app.state.gateway.connection_count() == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(app.state.gateway.connection_count(), 1);
    assert_eq!(app.state.gateway.presence().identity_count(), 0);
    assert_eq!(app.state.gateway.rooms().room_count(), 0);
}

#[tokio::test]
async fn test_malformed_frame_is_discarded() {
    let app = TestApp::new();
    let server = ws_server(&app);

    let mut alice = server
        .get_websocket("/gateway?email=alice@x&call=room-1")
        .await
        .into_websocket()
        .await;
    let mut bob = server
        .get_websocket("/gateway?email=bob@y&call=room-1")
        .await
        .into_websocket()
        .await;
    bob.receive_text().await; // existing-user
    bob.receive_text().await; // toggle-video replay
    alice.receive_text().await; // user-connected

    // Garbage never reaches the registries or other members
    alice.send_text("not json at all").await;
    alice
        .send_text(r#"{"event":"unknown-kind","data":{}}"#)
        .await;

    // A valid toggle still flows afterwards
    alice
        .send_text(r#"{"event":"toggle-video","data":{"enabled":true,"name":"alice","color":"red"}}"#)
        .await;
    let toggled: Value = serde_json::from_str(&bob.receive_text().await).unwrap();
    assert_eq!(toggled["event"], "toggle-video");
    assert_eq!(toggled["data"]["enabled"], true);
    assert_eq!(toggled["data"]["name"], "alice");
}
