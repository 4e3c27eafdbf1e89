//! UseCase: 表示名の変更
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RenameParticipantUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：名前の変更、20 文字への切り詰め、2 人の同時変更
//! - 異常系：空白だけの名前（変更も送信もしない）

use std::sync::Arc;

use sketchroom_shared::protocol::ServerMessage;

use crate::domain::{MessagePusher, RoomId, RoomRepository, User, UserId};

use super::{audience::broadcast_tailored, error::SessionError};

/// 表示名変更のユースケース
pub struct RenameParticipantUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RenameParticipantUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 表示名を変更し、全員に `users-changed` を送信
    ///
    /// 名前は前後の空白を除去し 20 文字に切り詰める。空白だけの名前は拒否する。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        new_name: &str,
    ) -> Result<User, SessionError> {
        let user = self.repository.rename(room_id, user_id, new_name).await?;
        tracing::info!(
            "User '{}' renamed to '{}'",
            user_id.as_str(),
            user.name.as_str()
        );

        let users = self.repository.list_users(room_id).await;
        broadcast_tailored(self.message_pusher.as_ref(), &users, |users| {
            ServerMessage::UsersChanged { users }
        })
        .await;
        Ok(user)
    }
}
