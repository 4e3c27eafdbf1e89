//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{MessagePushError, RepositoryError, ValueObjectError};

/// セッション（接続）単位の操作エラー
///
/// いずれもネットワーク境界ではログに残すだけで、送信元には返さない。
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has not joined a room")]
    NotJoined,

    #[error("session has already joined a room")]
    AlreadyJoined,

    #[error("session is closed")]
    Closed,

    #[error(transparent)]
    Rejected(#[from] RepositoryError),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Push(#[from] MessagePushError),
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}
