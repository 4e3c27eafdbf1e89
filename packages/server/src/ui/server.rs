//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{GetRoomUseCase, SessionCoordinator};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Sketchroom synchronization server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(coordinator, get_room_usecase);
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// SessionCoordinator（接続ごとのメッセージ処理）
    coordinator: Arc<SessionCoordinator>,
    /// GetRoomUseCase（ルーム情報取得のユースケース）
    get_room_usecase: Arc<GetRoomUseCase>,
}

impl Server {
    pub fn new(coordinator: Arc<SessionCoordinator>, get_room_usecase: Arc<GetRoomUseCase>) -> Self {
        Self {
            coordinator,
            get_room_usecase,
        }
    }

    /// Build the router with every endpoint mounted.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            coordinator: self.coordinator.clone(),
            get_room_usecase: self.get_room_usecase.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server on `host:port` until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Sketchroom server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?room=default", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener (no shutdown signal).
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }
}
