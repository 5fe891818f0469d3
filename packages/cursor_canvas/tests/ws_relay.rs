//! End-to-end relay behavior over real WebSocket connections.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use cursor_canvas::config::ServerConfig;
use cursor_canvas::{AppState, build_router};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serve the real router on an ephemeral port; returns the base address.
async fn spawn_server() -> std::net::SocketAddr {
    let state = AppState::new(ServerConfig::default());
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: std::net::SocketAddr) -> WsClient {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("websocket handshake");
    ws
}

async fn send_json(ws: &mut WsClient, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("send");
}

/// Next text frame as JSON; panics after 5s so a missed broadcast fails
/// the test rather than hanging it.
async fn recv_json(ws: &mut WsClient) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("server sent invalid JSON");
        }
    }
}

#[tokio::test]
async fn connect_move_state_disconnect_scenario() {
    let addr = spawn_server().await;

    let mut a = connect(addr).await;
    let mut b = connect(addr).await;

    // A (connected first) learns about B joining at the origin.
    let added = recv_json(&mut a).await;
    assert_eq!(added["type"], "cursorAdded");
    assert_eq!(added["cursor"]["x"], 0.0);
    assert_eq!(added["cursor"]["y"], 0.0);

    // A moves; B observes it, A hears nothing back.
    send_json(&mut a, json!({"type": "cursorMoved", "x": 5, "y": 7})).await;
    let moved = recv_json(&mut b).await;
    assert_eq!(moved["type"], "cursorsMoved");
    let moves = moved["movedCursors"].as_array().unwrap();
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0]["x"], 5.0);
    assert_eq!(moves[0]["y"], 7.0);
    let a_id = moves[0]["id"].clone();

    // B's snapshot contains exactly A at its latest position.
    send_json(&mut b, json!({"type": "getState"})).await;
    let state = recv_json(&mut b).await;
    assert_eq!(state["type"], "gotState");
    assert_eq!(state["state"], json!([{"id": a_id, "x": 5.0, "y": 7.0}]));

    // A disconnects; B is told, and B's next snapshot is empty.
    a.close(None).await.unwrap();
    let removed = recv_json(&mut b).await;
    assert_eq!(removed["type"], "cursorRemoved");
    assert_eq!(removed["id"], a_id);

    send_json(&mut b, json!({"type": "getState"})).await;
    let state = recv_json(&mut b).await;
    assert_eq!(state["state"], json!([]));
}

#[tokio::test]
async fn malformed_frames_get_error_and_unknown_types_are_ignored() {
    let addr = spawn_server().await;
    let mut client = connect(addr).await;

    client
        .send(Message::Text("definitely not json".into()))
        .await
        .unwrap();
    let reply = recv_json(&mut client).await;
    assert_eq!(reply["type"], "error");

    // Unknown event type: silently ignored, session stays open.
    send_json(&mut client, json!({"type": "teleport", "x": 1})).await;
    send_json(&mut client, json!({"type": "getState"})).await;
    let reply = recv_json(&mut client).await;
    assert_eq!(reply["type"], "gotState");
    assert_eq!(reply["state"], json!([]));
}

#[tokio::test]
async fn broadcast_reaches_all_other_sessions() {
    let addr = spawn_server().await;

    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    let mut c = connect(addr).await;

    // Drain the join announcements (A sees B and C, B sees C).
    recv_json(&mut a).await;
    recv_json(&mut a).await;
    recv_json(&mut b).await;

    send_json(&mut c, json!({"type": "cursorMoved", "x": 9, "y": 4})).await;

    for peer in [&mut a, &mut b] {
        let moved = recv_json(peer).await;
        assert_eq!(moved["type"], "cursorsMoved");
        assert_eq!(moved["movedCursors"][0]["x"], 9.0);
    }
}

#[tokio::test]
async fn http_routes_and_error_statuses() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();

    // Root serves the canvas page.
    let resp = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("canvas"));

    // The channel path without upgrade semantics is a client error.
    let resp = client.get(format!("http://{addr}/ws")).send().await.unwrap();
    assert_eq!(resp.status(), 400);

    // Anything else is not found.
    let resp = client
        .get(format!("http://{addr}/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Health reports the connected session count.
    let resp = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let health: Value = resp.json().await.unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["sessions"], 0);
}
