//! Domain layer
//!
//! - `entity` / `value_object`: ストローク・ユーザーとその構成要素
//! - `drawing_state`: ルームごとの描画履歴（Drawing State Store）
//! - `presence`: ルームごとの在室ユーザー（Presence Registry）
//! - `repository` / `message_pusher`: Infrastructure 層が実装するインターフェース

pub mod drawing_state;
pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod presence;
pub mod repository;
pub mod value_object;

pub use drawing_state::DrawingState;
pub use entity::{Point, Stroke, Tool, User};
pub use error::{DrawingError, MessagePushError, PresenceError, RepositoryError, ValueObjectError};
pub use factory::{USER_PALETTE, UserFactory};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use presence::{PresenceRegistry, RoomPresence, sort_for_viewer};
pub use repository::{RoomRepository, RoomSummary};
pub use value_object::{
    Color, LineWidth, MAX_USER_NAME_CHARS, RoomId, StrokeId, Timestamp, UserId, UserName,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
