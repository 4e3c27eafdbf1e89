//! UseCase: 取り消し・やり直し・全消去
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EditHistoryUseCase::undo() / redo() / clear()
//! - ルーム全体で共有される履歴の操作と、全員への通知
//!
//! ### なぜこのテストが必要か
//! - 誰の undo でもルームの直近のストロークが取り消されることを保証
//! - 何も起きなかった操作が誰にも通知されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：他人のストロークの undo → redo
//! - 異常系：空の履歴での undo / redo
//! - エッジケース：clear 後の undo、新しいストローク後の redo

use std::sync::Arc;

use sketchroom_shared::protocol::ServerMessage;

use crate::domain::{MessagePusher, RoomId, RoomRepository, StrokeId};

use super::{
    audience::{broadcast, everyone},
    error::SessionError,
};

/// 履歴操作のユースケース
pub struct EditHistoryUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl EditHistoryUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルームの直近のストロークを取り消し、要求者を含む全員に `stroke-undone` を送信
    pub async fn undo(&self, room_id: &RoomId) -> Result<StrokeId, SessionError> {
        let stroke = self.repository.undo(room_id).await?;
        tracing::info!(
            "Stroke '{}' undone in room '{}'",
            stroke.id.as_str(),
            room_id.as_str()
        );
        let message = ServerMessage::StrokeUndone {
            stroke_id: stroke.id.as_str().to_string(),
        };
        self.notify_everyone(room_id, &message).await?;
        Ok(stroke.id)
    }

    /// 直近に取り消したストロークを履歴の末尾に戻し、全員に `stroke-redone` を送信
    pub async fn redo(&self, room_id: &RoomId) -> Result<StrokeId, SessionError> {
        let stroke = self.repository.redo(room_id).await?;
        tracing::info!(
            "Stroke '{}' redone in room '{}'",
            stroke.id.as_str(),
            room_id.as_str()
        );
        let message = ServerMessage::StrokeRedone {
            stroke_id: stroke.id.as_str().to_string(),
        };
        self.notify_everyone(room_id, &message).await?;
        Ok(stroke.id)
    }

    /// キャンバスを全消去し、全員に `canvas-cleared` を送信（取り消し不可）
    pub async fn clear(&self, room_id: &RoomId) -> Result<(), SessionError> {
        self.repository.clear(room_id).await?;
        tracing::info!("Canvas cleared in room '{}'", room_id.as_str());
        self.notify_everyone(room_id, &ServerMessage::CanvasCleared)
            .await
    }

    async fn notify_everyone(
        &self,
        room_id: &RoomId,
        message: &ServerMessage,
    ) -> Result<(), SessionError> {
        let users = self.repository.list_users(room_id).await;
        broadcast(self.message_pusher.as_ref(), everyone(&users), message).await
    }
}
