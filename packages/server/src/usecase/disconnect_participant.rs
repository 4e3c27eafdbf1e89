//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 在室者からの削除と、残った参加者への通知
//!
//! ### なぜこのテストが必要か
//! - 切断したユーザーが在室者一覧に残らないことを保証
//! - 描きかけのストロークが放置されても他の参加者に影響しないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人のルームからの切断
//! - 異常系：ルームに居ないユーザーの切断
//! - エッジケース：描画中の切断、最後の 1 人の切断

use std::sync::Arc;

use sketchroom_shared::protocol::ServerMessage;

use crate::domain::{MessagePusher, RoomId, RoomRepository, User, UserId};

use super::{audience::broadcast_tailored, error::SessionError};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者切断を実行
    ///
    /// 残った参加者へ `users-changed` と `peer-left` を送信する。
    /// 未確定のストロークはそのまま残る。
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - 削除されたユーザー
    /// * `Err(SessionError)` - ユーザーがルームに居なかった
    pub async fn execute(&self, room_id: &RoomId, user_id: &UserId) -> Result<User, SessionError> {
        self.message_pusher.unregister_client(user_id).await;
        let user = self.repository.leave(room_id, user_id).await?;

        tracing::info!(
            "User '{}' left room '{}'",
            user_id.as_str(),
            room_id.as_str()
        );

        let remaining = self.repository.list_users(room_id).await;
        let pusher = self.message_pusher.as_ref();
        broadcast_tailored(pusher, &remaining, |users| ServerMessage::UsersChanged { users })
            .await;
        broadcast_tailored(pusher, &remaining, |users| ServerMessage::PeerLeft {
            user_id: user_id.as_str().to_string(),
            users,
        })
        .await;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            Color, LineWidth, Point, PresenceError, RepositoryError, Stroke, StrokeId, Timestamp,
            Tool,
        },
        usecase::testing::{create_test_message_pusher, create_test_repository, join},
    };

    #[tokio::test]
    async fn test_disconnect_participant_success() {
        // テスト項目: 切断したユーザーが在室者から削除され、残りの参加者に通知される
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let room_id = RoomId::default();
        let alice = join(&repository, &message_pusher, &room_id).await;
        let mut bob = join(&repository, &message_pusher, &room_id).await;
        bob.drain();
        let usecase = DisconnectParticipantUseCase::new(repository.clone(), message_pusher.clone());

        // when (操作):
        let removed = usecase.execute(&room_id, &alice.user.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(removed, alice.user);
        assert_eq!(repository.list_users(&room_id).await, vec![bob.user.clone()]);
        assert_eq!(message_pusher.client_count().await, 1);

        let bob_data: sketchroom_shared::protocol::UserData = (&bob.user).into();
        assert_eq!(
            bob.drain(),
            vec![
                ServerMessage::UsersChanged {
                    users: vec![bob_data.clone()],
                },
                ServerMessage::PeerLeft {
                    user_id: alice.user.id.as_str().to_string(),
                    users: vec![bob_data],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_disconnect_unknown_user_error() {
        // テスト項目: ルームに居ないユーザーの切断はエラーになる
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let room_id = RoomId::default();
        let alice = join(&repository, &message_pusher, &room_id).await;
        let usecase = DisconnectParticipantUseCase::new(repository.clone(), message_pusher);
        usecase.execute(&room_id, &alice.user.id).await.unwrap();

        // when (操作): 同じユーザーをもう一度切断
        let result = usecase.execute(&room_id, &alice.user.id).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(SessionError::Rejected(RepositoryError::Presence(
                PresenceError::RoomNotFound(_)
            )))
        ));
    }

    #[tokio::test]
    async fn test_disconnect_mid_stroke_leaves_stroke_unfinalized() {
        // テスト項目: 描画中に切断してもストロークは未確定のまま残り、snapshot には含まれない
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let room_id = RoomId::default();
        let alice = join(&repository, &message_pusher, &room_id).await;
        let stroke_id = StrokeId::new("s1".to_string()).unwrap();
        repository
            .begin_stroke(
                &room_id,
                Stroke::begin(
                    stroke_id.clone(),
                    alice.user.id.clone(),
                    Tool::Brush,
                    Color::new("#000000".to_string()).unwrap(),
                    LineWidth::new(2.0).unwrap(),
                    Point::new(1.0, 1.0).unwrap(),
                    Timestamp::new(0),
                ),
            )
            .await
            .unwrap();
        let usecase = DisconnectParticipantUseCase::new(repository.clone(), message_pusher);

        // when (操作):
        usecase.execute(&room_id, &alice.user.id).await.unwrap();

        // then (期待する結果):
        assert!(repository.snapshot(&room_id).await.is_empty());
        let summary = repository.room_summary(&room_id).await.unwrap();
        assert_eq!(summary.undo_depth, 1);
        assert!(summary.users.is_empty());
    }
}
