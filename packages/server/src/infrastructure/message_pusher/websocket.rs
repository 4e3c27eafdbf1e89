//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` をユーザー ID で管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 実際のソケットへの書き込みは UI 層の pusher loop が行うため、
//! ここでの送信はブロックしません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, PusherChannel, UserId};

/// WebSocket を使った MessagePusher 実装
#[derive(Debug, Default)]
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    clients: Mutex<HashMap<UserId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中のクライアント数
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, user_id: UserId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", user_id.as_str());
        clients.insert(user_id, sender);
    }

    async fn unregister_client(&self, user_id: &UserId) {
        let mut clients = self.clients.lock().await;
        clients.remove(user_id);
        tracing::debug!(
            "Client '{}' unregistered from MessagePusher",
            user_id.as_str()
        );
    }

    async fn push_to(&self, user_id: &UserId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(user_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(user_id.as_str().to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", user_id.as_str());
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<UserId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!(
                            "Failed to push message to client '{}': {}",
                            target.as_str(),
                            e
                        );
                    }
                }
                None => {
                    tracing::warn!(
                        "Client '{}' not found during broadcast, skipping",
                        target.as_str()
                    );
                }
            }
        }

        Ok(())
    }
}
