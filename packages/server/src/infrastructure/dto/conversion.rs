//! Conversion logic between DTOs and domain entities.

use sketchroom_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    RoomSummary, ValueObjectError,
    entity::{self, Stroke, User},
    sort_for_viewer,
};
use crate::infrastructure::dto::{http, websocket as wire};

// ========================================
// Wire → Domain
// ========================================

impl TryFrom<wire::Point> for entity::Point {
    type Error = ValueObjectError;

    fn try_from(point: wire::Point) -> Result<Self, Self::Error> {
        entity::Point::new(point.x, point.y)
    }
}

impl From<wire::Tool> for entity::Tool {
    fn from(tool: wire::Tool) -> Self {
        match tool {
            wire::Tool::Brush => Self::Brush,
            wire::Tool::Eraser => Self::Eraser,
        }
    }
}

// ========================================
// Domain → Wire
// ========================================

impl From<entity::Point> for wire::Point {
    fn from(point: entity::Point) -> Self {
        Self::new(point.x, point.y)
    }
}

impl From<entity::Tool> for wire::Tool {
    fn from(tool: entity::Tool) -> Self {
        match tool {
            entity::Tool::Brush => Self::Brush,
            entity::Tool::Eraser => Self::Eraser,
        }
    }
}

impl From<&Stroke> for wire::StrokeData {
    fn from(stroke: &Stroke) -> Self {
        Self {
            id: stroke.id.as_str().to_string(),
            owner_id: stroke.owner_id.as_str().to_string(),
            tool: stroke.tool.into(),
            color: stroke.color.as_str().to_string(),
            line_width: stroke.line_width.value(),
            points: stroke.points().iter().copied().map(Into::into).collect(),
            finalized: stroke.is_finalized(),
            created_at: stroke.created_at.value(),
        }
    }
}

impl From<&User> for wire::UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_str().to_string(),
            name: user.name.as_str().to_string(),
            color: user.color.as_str().to_string(),
            joined_at: user.joined_at.value(),
        }
    }
}

/// `stroke-started` メッセージを作成（所有者の表示色を含む）
pub fn stroke_started(stroke: &Stroke, owner: &User) -> wire::ServerMessage {
    wire::ServerMessage::StrokeStarted {
        id: stroke.id.as_str().to_string(),
        owner_id: stroke.owner_id.as_str().to_string(),
        owner_color: owner.color.as_str().to_string(),
        tool: stroke.tool.into(),
        color: stroke.color.as_str().to_string(),
        line_width: stroke.line_width.value(),
        points: stroke.points().iter().copied().map(Into::into).collect(),
    }
}

/// 受信者向けに並べ替えたユーザー一覧を作成
pub fn users_for_viewer(users: &[User], viewer: &entity::User) -> Vec<wire::UserData> {
    sort_for_viewer(users.to_vec(), &viewer.id)
        .iter()
        .map(Into::into)
        .collect()
}

// ========================================
// Domain → HTTP
// ========================================

impl From<RoomSummary> for http::RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        let mut users: Vec<String> = summary
            .users
            .into_iter()
            .map(|u| u.name.into_string())
            .collect();
        users.sort();
        Self {
            id: summary.id.into_string(),
            users,
            visible_strokes: summary.visible_strokes,
        }
    }
}

impl From<RoomSummary> for http::RoomDetailDto {
    fn from(summary: RoomSummary) -> Self {
        let mut users = summary.users;
        users.sort_by(|a, b| (a.name.as_str(), a.id.as_str()).cmp(&(b.name.as_str(), b.id.as_str())));
        Self {
            id: summary.id.into_string(),
            users: users
                .into_iter()
                .map(|u| http::UserDetailDto {
                    id: u.id.into_string(),
                    name: u.name.into_string(),
                    color: u.color.into_string(),
                    joined_at: timestamp_to_jst_rfc3339(u.joined_at.value()),
                })
                .collect(),
            visible_strokes: summary.visible_strokes,
            undo_depth: summary.undo_depth,
            redo_depth: summary.redo_depth,
        }
    }
}
