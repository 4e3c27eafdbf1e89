//! UseCase: ストロークの描画
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DrawStrokeUseCase::start() / extend() / finish()
//! - ストロークの開始・点の追加・確定と、他の参加者への中継
//!
//! ### なぜこのテストが必要か
//! - 所有者以外がストロークを変更できないことを保証
//! - 拒否された操作が誰にも送信されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：start → move × N → end
//! - 異常系：他人のストロークへの move / end、確定済みストロークへの move
//! - エッジケース：不正な線幅・色・座標

use std::sync::Arc;

use sketchroom_shared::{
    protocol::{self as wire, ServerMessage},
    time::Clock,
};

use crate::{
    domain::{
        Color, LineWidth, MessagePusher, Point, PresenceError, RepositoryError, RoomId,
        RoomRepository, Stroke, StrokeId, Timestamp, UserId,
    },
    infrastructure::dto::conversion::stroke_started,
};

use super::{
    audience::{broadcast, others, unicast},
    error::SessionError,
};

/// `start-stroke` の入力
#[derive(Debug, Clone, PartialEq)]
pub struct StartStrokeInput {
    pub tool: wire::Tool,
    pub color: String,
    pub line_width: f64,
    pub point: wire::Point,
    /// `stroke-assigned` でそのまま所有者に返す
    pub token: Option<String>,
}

/// ストローク描画のユースケース
pub struct DrawStrokeUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DrawStrokeUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 新しいストロークを開始
    ///
    /// ストローク ID はサーバーで生成し、所有者にだけ `stroke-assigned` で知らせる。
    /// 他の参加者には所有者の表示色を含む `stroke-started` を送信する。
    pub async fn start(
        &self,
        room_id: &RoomId,
        owner_id: &UserId,
        input: StartStrokeInput,
    ) -> Result<StrokeId, SessionError> {
        let color = Color::new(input.color)?;
        let line_width = LineWidth::new(input.line_width)?;
        let point = Point::try_from(input.point)?;

        let owner = self
            .repository
            .get_user(room_id, owner_id)
            .await
            .ok_or_else(|| PresenceError::UnknownUser(owner_id.as_str().to_string()))
            .map_err(RepositoryError::from)?;

        let stroke = Stroke::begin(
            StrokeId::generate(),
            owner.id.clone(),
            input.tool.into(),
            color,
            line_width,
            point,
            Timestamp::new(self.clock.now_millis()),
        );
        let stroke_id = stroke.id.clone();
        self.repository.begin_stroke(room_id, stroke.clone()).await?;

        let pusher = self.message_pusher.as_ref();
        let assigned = ServerMessage::StrokeAssigned {
            stroke_id: stroke_id.as_str().to_string(),
            token: input.token,
        };
        unicast(pusher, owner_id, &assigned).await?;

        let users = self.repository.list_users(room_id).await;
        broadcast(pusher, others(&users, owner_id), &stroke_started(&stroke, &owner)).await?;

        tracing::debug!(
            "Stroke '{}' started by '{}'",
            stroke_id.as_str(),
            owner_id.as_str()
        );
        Ok(stroke_id)
    }

    /// 所有者の未確定ストロークに点を追加
    pub async fn extend(
        &self,
        room_id: &RoomId,
        owner_id: &UserId,
        stroke_id: String,
        point: wire::Point,
    ) -> Result<(), SessionError> {
        let stroke_id = StrokeId::new(stroke_id)?;
        let point = Point::try_from(point)?;

        self.repository
            .append_point(room_id, &stroke_id, owner_id, point)
            .await?;

        let users = self.repository.list_users(room_id).await;
        let extended = ServerMessage::StrokeExtended {
            stroke_id: stroke_id.into_string(),
            point: point.into(),
        };
        broadcast(self.message_pusher.as_ref(), others(&users, owner_id), &extended).await
    }

    /// 所有者の未確定ストロークを確定
    pub async fn finish(
        &self,
        room_id: &RoomId,
        owner_id: &UserId,
        stroke_id: String,
    ) -> Result<(), SessionError> {
        let stroke_id = StrokeId::new(stroke_id)?;

        self.repository
            .finalize_stroke(room_id, &stroke_id, owner_id)
            .await?;

        tracing::debug!(
            "Stroke '{}' finalized by '{}'",
            stroke_id.as_str(),
            owner_id.as_str()
        );

        let users = self.repository.list_users(room_id).await;
        let finalized = ServerMessage::StrokeFinalized {
            stroke_id: stroke_id.into_string(),
        };
        broadcast(self.message_pusher.as_ref(), others(&users, owner_id), &finalized).await
    }
}
