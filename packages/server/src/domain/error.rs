//! ドメイン層のエラー型

use thiserror::Error;

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    #[error("{0} id must not be empty")]
    EmptyId(&'static str),

    #[error("{kind} id must be at most {max} bytes")]
    IdTooLong { kind: &'static str, max: usize },

    #[error("user name must contain at least one non-whitespace character")]
    EmptyName,

    #[error("color must not be empty")]
    EmptyColor,

    #[error("color must be at most {0} bytes")]
    ColorTooLong(usize),

    #[error("line width must be a positive finite number, got {0}")]
    InvalidLineWidth(f64),

    #[error("point coordinates must be finite")]
    NonFinitePoint,
}

/// Drawing State Store の操作結果（失敗側）
///
/// いずれも副作用なしで拒否されたことを表す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawingError {
    #[error("stroke '{0}' already exists")]
    DuplicateStroke(String),

    #[error("stroke '{0}' not found")]
    StrokeNotFound(String),

    #[error("stroke '{stroke_id}' is not owned by '{requested_by}'")]
    OwnershipDenied {
        stroke_id: String,
        requested_by: String,
    },

    #[error("stroke '{0}' is already finalized")]
    AlreadyFinalized(String),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

/// Presence Registry の操作エラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PresenceError {
    #[error("room '{0}' has no participants")]
    RoomNotFound(String),

    #[error("user '{0}' is not in the room")]
    UnknownUser(String),

    #[error("invalid user name: {0}")]
    InvalidName(#[from] ValueObjectError),
}

/// Repository のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Drawing(#[from] DrawingError),

    #[error(transparent)]
    Presence(#[from] PresenceError),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
