//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() / notify_joined()
//! - 新しいユーザーの生成とルームへの登録、参加時の通知
//!
//! ### なぜこのテストが必要か
//! - 参加直後のクライアントがキャンバスと在室者を正しく復元できることを保証
//! - 既存の参加者に新しい参加者が通知されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：空のルームへの参加、既存の参加者が居るルームへの参加
//! - エッジケース：未確定のストロークがあるルームへの参加

use std::sync::Arc;

use sketchroom_shared::{protocol::ServerMessage, time::Clock};

use crate::{
    domain::{MessagePusher, PusherChannel, RoomId, RoomRepository, Timestamp, User, UserFactory},
    infrastructure::dto::conversion::users_for_viewer,
};

use super::{
    audience::{broadcast, broadcast_tailored, others, unicast},
    error::SessionError,
};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 新しいユーザーを生成してルームに登録する
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加するルーム（存在しなければ作成される）
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - 生成されたユーザー
    /// * `Err(SessionError)` - 登録失敗
    pub async fn execute(
        &self,
        room_id: &RoomId,
        sender: PusherChannel,
    ) -> Result<User, SessionError> {
        let user = UserFactory::create(Timestamp::new(self.clock.now_millis()));

        self.repository.join(room_id, user.clone()).await?;
        self.message_pusher
            .register_client(user.id.clone(), sender)
            .await;

        tracing::info!(
            "User '{}' ({}) joined room '{}'",
            user.id.as_str(),
            user.name.as_str(),
            room_id.as_str()
        );
        Ok(user)
    }

    /// 参加時の通知を送信
    ///
    /// 1. 本人へ `initial-state`（確定済みストロークと在室者一覧）
    /// 2. 他の参加者へ `peer-joined`
    /// 3. 全員へ `users-changed`
    pub async fn notify_joined(&self, room_id: &RoomId, user: &User) -> Result<(), SessionError> {
        let strokes = self.repository.snapshot(room_id).await;
        let users = self.repository.list_users(room_id).await;
        let pusher = self.message_pusher.as_ref();

        let initial_state = ServerMessage::InitialState {
            strokes: strokes.iter().map(Into::into).collect(),
            user: user.into(),
            users: users_for_viewer(&users, user),
        };
        unicast(pusher, &user.id, &initial_state).await?;

        let peer_joined = ServerMessage::PeerJoined { user: user.into() };
        broadcast(pusher, others(&users, &user.id), &peer_joined).await?;

        broadcast_tailored(pusher, &users, |users| ServerMessage::UsersChanged { users }).await;

        tracing::debug!(
            "Sent initial state ({} strokes, {} users) to '{}'",
            strokes.len(),
            users.len(),
            user.id.as_str()
        );
        Ok(())
    }
}
