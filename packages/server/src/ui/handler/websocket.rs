//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use sketchroom_shared::protocol::ClientMessage;
use tokio::sync::mpsc;

use crate::{
    domain::{DrawingError, RepositoryError, RoomId, UserId},
    ui::state::AppState,
    usecase::{Session, SessionError},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub room: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = match query.room {
        None => RoomId::default(),
        Some(room) => match RoomId::try_from(room.clone()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Invalid room '{}': {}", room, e);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id)))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Every message addressed to this connection (unicast or broadcast) goes through
/// this single channel, so per-connection delivery order is the push order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = Session::new(room_id);

    let mut send_task = pusher_loop(rx, sender);

    match state.coordinator.join(&mut session, tx).await {
        Ok(user) => tracing::info!(
            "Connection bound to '{}' in room '{}'",
            user.id.as_str(),
            session.room_id().as_str()
        ),
        Err(e) => tracing::warn!("Failed to join room '{}': {}", session.room_id().as_str(), e),
    }
    let Some(user_id) = session.user_id().cloned() else {
        send_task.abort();
        return;
    };

    let coordinator = state.coordinator.clone();
    let recv_session = session.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let message = match ClientMessage::decode(&text) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::warn!(
                                "Dropped malformed message from '{}': {}",
                                user_id.as_str(),
                                e
                            );
                            continue;
                        }
                    };
                    tracing::debug!("Received from '{}': {:?}", user_id.as_str(), message);

                    if let Err(e) = coordinator.handle(&recv_session, message).await {
                        log_dropped(&user_id, &e);
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", user_id.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state.coordinator.leave(&mut session).await {
        Ok(Some(user)) => tracing::info!("Client '{}' disconnected", user.id.as_str()),
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to leave room '{}': {}", session.room_id().as_str(), e),
    }
}

/// 処理されなかったメッセージを記録（送信元には何も返さない）
fn log_dropped(user_id: &UserId, error: &SessionError) {
    match error {
        SessionError::Rejected(RepositoryError::Drawing(
            DrawingError::NothingToUndo | DrawingError::NothingToRedo,
        )) => tracing::debug!("No-op from '{}': {}", user_id.as_str(), error),
        _ => tracing::warn!("Dropped message from '{}': {}", user_id.as_str(), error),
    }
}
