//! Call Room Scenarios
//!
//! Join ordering, disconnect broadcasts, toggle state and relay unicast.

use chat_realtime::domain::PeerState;
use chat_realtime::realtime::{ClientMessage, ServerEvent, SignalKind};
use pretty_assertions::assert_eq;

use crate::common::TestApp;

#[tokio::test]
async fn test_second_joiner_learns_existing_peer_before_announcement() {
    let app = TestApp::new();
    let mut c1 = app.connect(Some("alice@x"), Some("call-1"));
    let mut c2 = app.connect(Some("bob@y"), Some("call-1"));

    let c2_events = c2.events();
    assert_eq!(
        c2_events,
        vec![
            ServerEvent::ExistingUser(c1.id),
            ServerEvent::toggle(c1.id, PeerState::default()),
        ]
    );

    // c1 hears exactly one announcement; c2 never hears about itself
    assert_eq!(c1.events(), vec![ServerEvent::UserConnected(c2.id)]);
    assert!(!c2_events.contains(&ServerEvent::UserConnected(c2.id)));
}

#[tokio::test]
async fn test_late_joiner_sees_only_present_peers() {
    let app = TestApp::new();
    let c1 = app.connect(None, Some("call-1"));
    let _c2 = app.connect(None, Some("call-1"));
    app.state.gateway.on_disconnect(c1.id);

    let mut c3 = app.connect(None, Some("call-1"));
    let seen: Vec<_> = c3
        .events()
        .into_iter()
        .filter_map(|event| match event {
            ServerEvent::ExistingUser(id) => Some(id),
            _ => None,
        })
        .collect();

    // The departed c1 must not be replayed to the newcomer
    assert!(!seen.contains(&c1.id));
    assert_eq!(seen.len(), 1);
}

#[tokio::test]
async fn test_disconnect_broadcasts_and_cleans_up() {
    let app = TestApp::new();
    let c1 = app.connect(Some("alice@x"), Some("call-1"));
    let mut c2 = app.connect(Some("bob@y"), Some("call-1"));
    c2.events();

    app.state.gateway.on_disconnect(c1.id);

    assert_eq!(c2.events(), vec![ServerEvent::UserDisconnected(c1.id)]);
    assert!(!app.state.gateway.rooms().members("call-1").contains(&c1.id));
    assert!(app.state.gateway.presence().resolve("alice@x").is_empty());
}

#[tokio::test]
async fn test_toggle_video_reaches_other_members_only() {
    let app = TestApp::new();
    let c1 = app.connect(None, Some("call-1"));
    let mut c2 = app.connect(None, Some("call-1"));
    let mut c3 = app.connect(None, Some("call-1"));
    c2.events();
    c3.events();

    let state = PeerState {
        enabled: true,
        name: "alice".into(),
        color: "green".into(),
    };
    app.state
        .gateway
        .handle_message(c1.id, ClientMessage::ToggleVideo(state.clone()));

    let expected = ServerEvent::toggle(c1.id, state.clone());
    assert_eq!(c2.events(), vec![expected.clone()]);
    assert_eq!(c3.events(), vec![expected]);
    assert_eq!(
        app.state.gateway.rooms().peer_state("call-1", c1.id),
        Some(state)
    );
}

#[tokio::test]
async fn test_offer_is_delivered_only_to_target() {
    let app = TestApp::new();
    let a = app.connect(None, Some("call-1"));
    let mut b = app.connect(None, Some("call-1"));
    let mut c = app.connect(None, Some("call-1"));
    b.events();
    c.events();

    app.state.gateway.handle_message(
        a.id,
        ClientMessage::Offer {
            payload: serde_json::json!({"sdp": "v=0"}),
            to: b.id,
        },
    );

    assert_eq!(
        b.events(),
        vec![ServerEvent::Offer {
            payload: serde_json::json!({"sdp": "v=0"}),
            from: a.id,
        }]
    );
    assert!(c.events().is_empty());
}

#[tokio::test]
async fn test_relay_to_departed_target_is_dropped() {
    let app = TestApp::new();
    let a = app.connect(None, Some("call-1"));
    let b = app.connect(None, Some("call-1"));
    app.state.gateway.on_disconnect(b.id);

    // Must not error or panic; the negotiation layer retries on its own
    app.state
        .gateway
        .relay(SignalKind::Answer, a.id, b.id, serde_json::json!({}));
}
