//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{GetRoomUseCase, SessionCoordinator};

/// Shared application state
pub struct AppState {
    /// SessionCoordinator（接続ごとのメッセージ処理）
    pub coordinator: Arc<SessionCoordinator>,
    /// GetRoomUseCase（ルーム情報取得のユースケース）
    pub get_room_usecase: Arc<GetRoomUseCase>,
}
