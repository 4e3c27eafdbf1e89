//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 描画状態はルームの最後の参加者が退出しても保持されます（プロセスの終了まで）。
//! 在室ユーザーのエントリは空になった時点で削除されます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    DrawingState, Point, PresenceRegistry, RepositoryError, RoomId, RoomRepository, RoomSummary,
    Stroke, StrokeId, User, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    drawings: HashMap<RoomId, DrawingState>,
    presence: PresenceRegistry,
}

impl Tables {
    fn summary(&self, room_id: &RoomId) -> Option<RoomSummary> {
        let users = self.presence.list(room_id);
        let drawing = self.drawings.get(room_id);
        if users.is_empty() && drawing.is_none() {
            return None;
        }
        Some(RoomSummary {
            id: room_id.clone(),
            users,
            visible_strokes: drawing.map(|d| d.visible().count()).unwrap_or(0),
            undo_depth: drawing.map(DrawingState::undo_depth).unwrap_or(0),
            redo_depth: drawing.map(DrawingState::redo_depth).unwrap_or(0),
        })
    }
}

/// インメモリ Room Repository 実装
///
/// 全ルームの Drawing State Store と Presence Registry を 1 つの Mutex で保持し、
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
#[derive(Debug, Default)]
pub struct InMemoryRoomRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn join(&self, room_id: &RoomId, user: User) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.drawings.entry(room_id.clone()).or_default();
        tables.presence.join(room_id, user);
        Ok(())
    }

    async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.presence.leave(room_id, user_id)?)
    }

    async fn rename(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        new_name: &str,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.presence.rename(room_id, user_id, new_name)?)
    }

    async fn get_user(&self, room_id: &RoomId, user_id: &UserId) -> Option<User> {
        let tables = self.tables.lock().await;
        tables.presence.user(room_id, user_id).cloned()
    }

    async fn list_users(&self, room_id: &RoomId) -> Vec<User> {
        let tables = self.tables.lock().await;
        tables.presence.list(room_id)
    }

    async fn begin_stroke(&self, room_id: &RoomId, stroke: Stroke) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .drawings
            .entry(room_id.clone())
            .or_default()
            .begin_stroke(stroke)?)
    }

    async fn append_point(
        &self,
        room_id: &RoomId,
        stroke_id: &StrokeId,
        owner_id: &UserId,
        point: Point,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .drawings
            .entry(room_id.clone())
            .or_default()
            .append_point(stroke_id, owner_id, point)?)
    }

    async fn finalize_stroke(
        &self,
        room_id: &RoomId,
        stroke_id: &StrokeId,
        owner_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .drawings
            .entry(room_id.clone())
            .or_default()
            .finalize(stroke_id, owner_id)?)
    }

    async fn undo(&self, room_id: &RoomId) -> Result<Stroke, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.drawings.entry(room_id.clone()).or_default().undo()?)
    }

    async fn redo(&self, room_id: &RoomId) -> Result<Stroke, RepositoryError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.drawings.entry(room_id.clone()).or_default().redo()?)
    }

    async fn clear(&self, room_id: &RoomId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        tables.drawings.entry(room_id.clone()).or_default().clear();
        Ok(())
    }

    async fn snapshot(&self, room_id: &RoomId) -> Vec<Stroke> {
        let tables = self.tables.lock().await;
        tables
            .drawings
            .get(room_id)
            .map(DrawingState::snapshot)
            .unwrap_or_default()
    }

    async fn room_summary(&self, room_id: &RoomId) -> Option<RoomSummary> {
        let tables = self.tables.lock().await;
        tables.summary(room_id)
    }

    async fn list_rooms(&self) -> Vec<RoomSummary> {
        let tables = self.tables.lock().await;
        let mut room_ids = tables.presence.room_ids();
        room_ids.sort();
        room_ids
            .iter()
            .filter_map(|room_id| tables.summary(room_id))
            .collect()
    }
}
