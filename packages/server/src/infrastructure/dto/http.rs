//! HTTP API response DTOs.

use serde::Serialize;

/// `GET /api/rooms` の 1 要素
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub users: Vec<String>,
    pub visible_strokes: usize,
}

/// `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub users: Vec<UserDetailDto>,
    pub visible_strokes: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailDto {
    pub id: String,
    pub name: String,
    pub color: String,
    /// RFC 3339 (JST)
    pub joined_at: Option<String>,
}
