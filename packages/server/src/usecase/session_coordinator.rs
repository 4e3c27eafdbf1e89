//! Session Coordinator
//!
//! 1 本の接続を 1 人のユーザーと 1 つのルームに結び付け、
//! 受信したメッセージを各ユースケースに振り分けます。
//!
//! 状態遷移: `Connecting → Joined → Disconnected`（終端）
//!
//! 各ハンドラ本体はルームのロック（`RoomGate`）を保持したまま実行されるため、
//! 同じルームの変更と送信は 1 つの順序に並ぶ。

use std::sync::Arc;

use sketchroom_shared::{protocol::ClientMessage, time::Clock};

use crate::domain::{MessagePusher, PusherChannel, RoomId, RoomRepository, User, UserId};

use super::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, DrawStrokeUseCase,
    EditHistoryUseCase, MoveCursorUseCase, RenameParticipantUseCase, RoomGate, SessionError,
    StartStrokeInput,
};

/// 接続の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Joined { user_id: UserId },
    Disconnected,
}

/// 1 本の接続のセッション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    room_id: RoomId,
    state: SessionState,
}

impl Session {
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            state: SessionState::Connecting,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 参加中ならユーザー ID
    pub fn user_id(&self) -> Option<&UserId> {
        match &self.state {
            SessionState::Joined { user_id } => Some(user_id),
            _ => None,
        }
    }
}

pub struct SessionCoordinator {
    gate: RoomGate,
    connect: ConnectParticipantUseCase,
    disconnect: DisconnectParticipantUseCase,
    draw: DrawStrokeUseCase,
    history: EditHistoryUseCase,
    cursor: MoveCursorUseCase,
    rename: RenameParticipantUseCase,
}

impl SessionCoordinator {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gate: RoomGate::new(),
            connect: ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            ),
            disconnect: DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            ),
            draw: DrawStrokeUseCase::new(repository.clone(), message_pusher.clone(), clock),
            history: EditHistoryUseCase::new(repository.clone(), message_pusher.clone()),
            cursor: MoveCursorUseCase::new(repository.clone(), message_pusher.clone()),
            rename: RenameParticipantUseCase::new(repository, message_pusher),
        }
    }

    /// `Connecting → Joined`
    ///
    /// ユーザーを生成して登録した時点で `Joined` になる。
    /// 参加通知の送信に失敗した場合もセッションは `Joined` のままエラーを返す。
    pub async fn join(
        &self,
        session: &mut Session,
        sender: PusherChannel,
    ) -> Result<User, SessionError> {
        match session.state {
            SessionState::Connecting => {}
            SessionState::Joined { .. } => return Err(SessionError::AlreadyJoined),
            SessionState::Disconnected => return Err(SessionError::Closed),
        }

        let _guard = self.gate.enter(&session.room_id).await;
        let user = self.connect.execute(&session.room_id, sender).await?;
        session.state = SessionState::Joined {
            user_id: user.id.clone(),
        };
        self.connect.notify_joined(&session.room_id, &user).await?;
        Ok(user)
    }

    /// 受信したメッセージを処理（`Joined` 以外では何もしない）
    pub async fn handle(
        &self,
        session: &Session,
        message: ClientMessage,
    ) -> Result<(), SessionError> {
        let user_id = session.user_id().ok_or(SessionError::NotJoined)?;
        let room_id = &session.room_id;

        let _guard = self.gate.enter(room_id).await;
        match message {
            ClientMessage::StartStroke {
                tool,
                color,
                line_width,
                point,
                token,
            } => {
                let input = StartStrokeInput {
                    tool,
                    color,
                    line_width,
                    point,
                    token,
                };
                self.draw.start(room_id, user_id, input).await.map(|_| ())
            }
            ClientMessage::MoveStroke { stroke_id, point } => {
                self.draw.extend(room_id, user_id, stroke_id, point).await
            }
            ClientMessage::EndStroke { stroke_id } => {
                self.draw.finish(room_id, user_id, stroke_id).await
            }
            ClientMessage::CursorMove { position } => {
                self.cursor.execute(room_id, user_id, position).await
            }
            ClientMessage::Undo => self.history.undo(room_id).await.map(|_| ()),
            ClientMessage::Redo => self.history.redo(room_id).await.map(|_| ()),
            ClientMessage::Clear => self.history.clear(room_id).await,
            ClientMessage::Rename { name } => {
                self.rename.execute(room_id, user_id, &name).await.map(|_| ())
            }
        }
    }

    /// `→ Disconnected`
    ///
    /// 参加中であれば在室者から削除し、残りの参加者に通知する。
    pub async fn leave(&self, session: &mut Session) -> Result<Option<User>, SessionError> {
        let previous = std::mem::replace(&mut session.state, SessionState::Disconnected);
        let SessionState::Joined { user_id } = previous else {
            return Ok(None);
        };

        let user = {
            let _guard = self.gate.enter(&session.room_id).await;
            self.disconnect.execute(&session.room_id, &user_id).await
        };
        self.gate.release(&session.room_id).await;
        Ok(Some(user?))
    }
}
