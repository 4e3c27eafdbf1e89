//! MessagePusher trait 定義
//!
//! 接続中のクライアントへメッセージを送信するためのインターフェース。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{MessagePushError, UserId};

/// クライアントへの送信チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// MessagePusher trait
///
/// - `push_to`: 特定のクライアントへ送信
/// - `broadcast`: 複数のクライアントへ送信（一部の失敗は許容）
///
/// 同じクライアントへの送信は呼び出し順に届く。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, user_id: UserId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, user_id: &UserId);

    /// 特定のクライアントへ送信
    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントへ送信
    async fn broadcast(&self, targets: Vec<UserId>, content: &str)
    -> Result<(), MessagePushError>;
}
