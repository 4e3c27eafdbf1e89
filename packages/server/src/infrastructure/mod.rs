//! Infrastructure layer
//!
//! - `repository`: RoomRepository の実装
//! - `message_pusher`: MessagePusher の実装
//! - `dto`: ドメインモデルとワイヤーフォーマット / HTTP レスポンスの変換

pub mod dto;
pub mod message_pusher;
pub mod repository;
