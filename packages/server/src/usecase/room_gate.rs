//! ルーム単位の直列化
//!
//! 同じルームに対するハンドラ本体（状態の変更とその結果の送信）を
//! 1 つずつ実行するための非同期ミューテックスを管理します。
//! 異なるルーム同士は互いに待たない。
//! 誰も保持・待機していないロックは `release` で取り除く。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::RoomId;

#[derive(Debug, Default)]
pub struct RoomGate {
    rooms: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
}

impl RoomGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// ルームのロックを取得（ガードを drop するまで他のハンドラは待機する）
    pub async fn enter(&self, room_id: &RoomId) -> OwnedMutexGuard<()> {
        let room_lock = {
            let mut rooms = self.rooms.lock().await;
            rooms
                .entry(room_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        room_lock.lock_owned().await
    }

    /// 保持も待機もされていなければ、ルームのロックを取り除く
    ///
    /// ガードと待機中の `enter` はそれぞれ `Arc` を持つため、
    /// 参照が表の 1 つだけならまだ誰も使っていない。
    pub async fn release(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.lock().await;
        if rooms
            .get(room_id)
            .is_some_and(|room_lock| Arc::strong_count(room_lock) == 1)
        {
            rooms.remove(room_id);
        }
    }

    /// ロックを持っているルームの数
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}
