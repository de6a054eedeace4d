use axum::{
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::stream::StreamExt;
use tracing::info;

use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Pump the broadcaster's outbound queue into the socket. The live
/// channel has no request/response semantics: client frames are ignored
/// except for Close.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let (client_id, mut rx) = state.feed.register();
    info!(client_id, "Feed client connected");

    loop {
        tokio::select! {
            frame = rx.recv() => match frame {
                Some(frame) => {
                    if socket.send(Message::Text(Utf8Bytes::from(frame))).await.is_err() {
                        break;
                    }
                }
                // The broadcaster dropped this client for lagging.
                None => break,
            },
            msg = socket.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    state.feed.disconnect(client_id);
    info!(client_id, "Feed client disconnected");
}
