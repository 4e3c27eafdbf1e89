//! UseCase: ルーム情報の取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, RoomSummary};

use super::error::GetRoomDetailError;

/// ルーム情報取得のユースケース
pub struct GetRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 参加者が居るルームの一覧（ルーム ID 順）
    pub async fn list(&self) -> Vec<RoomSummary> {
        self.repository.list_rooms().await
    }

    /// ルームの詳細
    pub async fn detail(&self, room_id: String) -> Result<RoomSummary, GetRoomDetailError> {
        let room_id = RoomId::new(room_id.clone())
            .map_err(|_| GetRoomDetailError::RoomNotFound(room_id))?;
        self.repository
            .room_summary(&room_id)
            .await
            .ok_or_else(|| GetRoomDetailError::RoomNotFound(room_id.into_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::testing::{create_test_message_pusher, create_test_repository, join};

    #[tokio::test]
    async fn test_list_returns_rooms_with_participants() {
        // テスト項目: 参加者が居るルームだけが ID 順で返される
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let studio = RoomId::new("studio".to_string()).unwrap();
        let lobby = RoomId::new("lobby".to_string()).unwrap();
        join(&repository, &message_pusher, &studio).await;
        join(&repository, &message_pusher, &lobby).await;
        let usecase = GetRoomUseCase::new(repository.clone());

        // when (操作):
        let rooms = usecase.list().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["lobby", "studio"]);
    }

    #[tokio::test]
    async fn test_detail_of_unknown_room_is_not_found() {
        // テスト項目: 存在しないルームの詳細は RoomNotFound になる
        // given (前提条件):
        let usecase = GetRoomUseCase::new(create_test_repository());

        // when (操作):
        let result = usecase.detail("nowhere".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(GetRoomDetailError::RoomNotFound("nowhere".to_string()))
        );
    }
}
