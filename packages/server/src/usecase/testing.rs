//! UseCase テスト用のフィクスチャ

use std::sync::Arc;

use sketchroom_shared::{
    protocol::ServerMessage,
    time::{Clock, FixedClock},
};
use tokio::sync::mpsc;

use crate::{
    domain::{RoomId, User},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
};

use super::ConnectParticipantUseCase;

/// テストで使う固定時刻（2023-01-01 00:00:00 JST）
pub(crate) const FIXED_NOW: i64 = 1672498800000;

pub(crate) fn create_test_repository() -> Arc<InMemoryRoomRepository> {
    Arc::new(InMemoryRoomRepository::new())
}

pub(crate) fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
    Arc::new(WebSocketMessagePusher::new())
}

pub(crate) fn create_test_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(FIXED_NOW))
}

/// 接続済みの参加者と、その参加者宛てのメッセージの受信口
pub(crate) struct Participant {
    pub user: User,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl Participant {
    /// 受信済みのメッセージを全て取り出す
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(json) = self.rx.try_recv() {
            messages.push(ServerMessage::decode(&json).unwrap());
        }
        messages
    }
}

/// ルームに参加させ、参加時の通知まで送信済みの状態にする
pub(crate) async fn join(
    repository: &Arc<InMemoryRoomRepository>,
    message_pusher: &Arc<WebSocketMessagePusher>,
    room_id: &RoomId,
) -> Participant {
    let usecase = ConnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        create_test_clock(),
    );
    let (tx, rx) = mpsc::unbounded_channel();
    let user = usecase.execute(room_id, tx).await.unwrap();
    usecase.notify_joined(room_id, &user).await.unwrap();
    Participant { user, rx }
}
