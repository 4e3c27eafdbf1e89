//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Point, RepositoryError, RoomId, Stroke, StrokeId, User, UserId};

/// ルームの読み取り専用サマリ
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub users: Vec<User>,
    pub visible_strokes: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

/// Room Repository trait
///
/// ルームの描画状態（Drawing State Store）と在室ユーザー（Presence Registry）への
/// インターフェース。UseCase 層はこの trait に依存し、具体的な実装には依存しない。
///
/// ルームは最初の `join` で暗黙的に作成される。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    // ---- Presence ----

    /// ユーザーをルームに登録（ルームが無ければ作成）
    async fn join(&self, room_id: &RoomId, user: User) -> Result<(), RepositoryError>;

    /// ユーザーをルームから削除
    async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> Result<User, RepositoryError>;

    /// 表示名を変更
    async fn rename(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        new_name: &str,
    ) -> Result<User, RepositoryError>;

    /// ユーザーを取得
    async fn get_user(&self, room_id: &RoomId, user_id: &UserId) -> Option<User>;

    /// 在室ユーザー一覧を取得（順序は保証しない）
    async fn list_users(&self, room_id: &RoomId) -> Vec<User>;

    // ---- Drawing State ----

    /// ストロークを開始
    async fn begin_stroke(&self, room_id: &RoomId, stroke: Stroke) -> Result<(), RepositoryError>;

    /// 未確定のストロークに点を追加
    async fn append_point(
        &self,
        room_id: &RoomId,
        stroke_id: &StrokeId,
        owner_id: &UserId,
        point: Point,
    ) -> Result<(), RepositoryError>;

    /// ストロークを確定
    async fn finalize_stroke(
        &self,
        room_id: &RoomId,
        stroke_id: &StrokeId,
        owner_id: &UserId,
    ) -> Result<(), RepositoryError>;

    /// 直近のストロークを取り消す（ルーム全体で共有）
    async fn undo(&self, room_id: &RoomId) -> Result<Stroke, RepositoryError>;

    /// 直近に取り消したストロークをやり直す
    async fn redo(&self, room_id: &RoomId) -> Result<Stroke, RepositoryError>;

    /// キャンバスを全消去
    async fn clear(&self, room_id: &RoomId) -> Result<(), RepositoryError>;

    /// 確定済みで表示中のストロークを history 順で取得
    async fn snapshot(&self, room_id: &RoomId) -> Vec<Stroke>;

    // ---- Read model ----

    /// ルームのサマリを取得
    async fn room_summary(&self, room_id: &RoomId) -> Option<RoomSummary>;

    /// 参加者が居るルームのサマリ一覧を取得
    async fn list_rooms(&self) -> Vec<RoomSummary>;
}
