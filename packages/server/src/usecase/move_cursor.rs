//! UseCase: カーソル位置の中継
//!
//! カーソル位置は保存せず、他の参加者へそのまま中継します。

use std::sync::Arc;

use sketchroom_shared::protocol::{self as wire, ServerMessage};

use crate::domain::{
    MessagePusher, Point, PresenceError, RepositoryError, RoomId, RoomRepository, UserId,
};

use super::{
    audience::{broadcast, others},
    error::SessionError,
};

/// カーソル移動のユースケース
pub struct MoveCursorUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl MoveCursorUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 他の参加者へ `cursor-moved` を送信
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        position: wire::Point,
    ) -> Result<(), SessionError> {
        let position = Point::try_from(position)?;
        let user = self
            .repository
            .get_user(room_id, user_id)
            .await
            .ok_or_else(|| PresenceError::UnknownUser(user_id.as_str().to_string()))
            .map_err(RepositoryError::from)?;

        let users = self.repository.list_users(room_id).await;
        let message = ServerMessage::CursorMoved {
            user_id: user.id.as_str().to_string(),
            user: (&user).into(),
            position: position.into(),
        };
        broadcast(self.message_pusher.as_ref(), others(&users, user_id), &message).await
    }
}
