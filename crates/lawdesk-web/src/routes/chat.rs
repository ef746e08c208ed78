//! Live chat over WebSocket and stored room history.

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use database::{message, Message};
use futures::{SinkExt, StreamExt};
use relay::RelayEvent;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// A room's stored messages, oldest first.
pub async fn history(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(room): Path<String>,
) -> Result<Json<Vec<Message>>> {
    Ok(Json(message::list_messages(state.db.pool(), &room).await?))
}

/// Upgrade to a WebSocket joined to `room`.
pub async fn socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, room))
}

async fn handle_socket(socket: WebSocket, state: AppState, room: String) {
    let mut subscription = state.hub.join(&room).await;
    let (mut sink, mut stream) = socket.split();
    info!(room = %room, "Chat socket connected");

    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { break };
                let text = match event.to_json() {
                    Ok(text) => text,
                    Err(err) => {
                        error!(room = %room, "Failed to encode relay event: {}", err);
                        continue;
                    }
                };
                if sink.send(WsMessage::Text(text)).await.is_err() {
                    break;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => relay_frame(&state, &room, &text).await,
                Some(Ok(WsMessage::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    debug!(room = %room, "Chat socket error: {}", err);
                    break;
                }
            }
        }
    }

    subscription.leave().await;
    info!(room = %room, "Chat socket disconnected");
}

/// Store chat text from known users and fan the frame out to the room.
async fn relay_frame(state: &AppState, room: &str, text: &str) {
    let event = match RelayEvent::parse(text) {
        Ok(event) => event,
        Err(err) => {
            warn!(room = %room, "Ignoring frame: {}", err);
            return;
        }
    };

    if let RelayEvent::Chat { message, sender } = &event {
        match message::save_for_username(state.db.pool(), room, sender, message).await {
            Ok(Some(saved)) => debug!(room = %room, message_id = saved.id, "Chat message stored"),
            Ok(None) => debug!(room = %room, sender = %sender, "Unknown sender, message not stored"),
            Err(err) => error!(room = %room, "Failed to store chat message: {}", err),
        }
    }

    let delivered = state.hub.publish(room, event).await;
    debug!(room = %room, delivered, "Relayed frame");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::{SinkExt, StreamExt};
    use serde_json::{json, Value};
    use tokio_tungstenite::tungstenite::Message as WsFrame;

    use crate::testing::TestApp;

    type Socket = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn connect(app: &TestApp, room: &str) -> Socket {
        let url = format!("ws://{}/ws/chat/{}", app.addr, room);
        let (socket, _) = tokio_tungstenite::connect_async(url).await.unwrap();
        socket
    }

    async fn wait_for_subscribers(app: &TestApp, room: &str, count: usize) {
        for _ in 0..100 {
            if app.state.hub.subscriber_count(room).await == count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("room {} never reached {} subscribers", room, count);
    }

    async fn next_json(socket: &mut Socket) -> Value {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        serde_json::from_str(frame.to_text().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_room_relay_and_history() {
        let app = TestApp::spawn().await;
        let (lawyer, _) = app.lawyer("counsel").await;
        let (amina, _) = app.client("amina").await;

        let mut client_socket = connect(&app, "case-1").await;
        let mut lawyer_socket = connect(&app, "case-1").await;
        let mut elsewhere = connect(&app, "case-2").await;
        wait_for_subscribers(&app, "case-1", 2).await;
        wait_for_subscribers(&app, "case-2", 1).await;

        client_socket.send(WsFrame::Text("not json".into())).await.unwrap();
        let hello = json!({"message": "Good morning", "sender": "amina"});
        client_socket.send(WsFrame::Text(hello.to_string().into())).await.unwrap();

        // The malformed frame was dropped, so the greeting arrives first.
        assert_eq!(next_json(&mut lawyer_socket).await, hello);
        assert_eq!(next_json(&mut client_socket).await, hello);

        let offer = json!({"signal": {"type": "offer", "sdp": "v=0"}, "sender": "counsel"});
        lawyer_socket.send(WsFrame::Text(offer.to_string().into())).await.unwrap();
        assert_eq!(next_json(&mut client_socket).await, offer);

        let ping = json!({"message": "anyone?", "sender": "nobody"});
        elsewhere.send(WsFrame::Text(ping.to_string().into())).await.unwrap();
        assert_eq!(next_json(&mut elsewhere).await, ping);

        // Only the greeting from a known user is kept; signals never are.
        let history: Value = app
            .get("/chat/case-1/messages", Some(lawyer.id))
            .await
            .json()
            .await
            .unwrap();
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["text"], "Good morning");
        assert_eq!(history[0]["sender_id"], amina.id);

        let other: Value = app
            .get("/chat/case-2/messages", Some(lawyer.id))
            .await
            .json()
            .await
            .unwrap();
        assert!(other.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_room_closed_when_sockets_leave() {
        let app = TestApp::spawn().await;
        let socket = connect(&app, "lobby").await;
        wait_for_subscribers(&app, "lobby", 1).await;

        drop(socket);
        for _ in 0..100 {
            if app.state.hub.room_count().await == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("room was not pruned");
    }
}
