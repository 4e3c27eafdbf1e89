//! Data Transfer Objects (DTOs)
//!
//! - `websocket`: WebSocket のワイヤーフォーマット（`sketchroom_shared::protocol` の再エクスポート）
//! - `http`: HTTP API のレスポンス
//! - `conversion`: ドメインモデルとの変換

pub mod conversion;
pub mod http;

pub mod websocket {
    pub use sketchroom_shared::protocol::*;
}
