//! Entities
//!
//! ID によって同一性が決まるドメインのオブジェクトを定義します。

use serde::Serialize;

use super::{
    error::ValueObjectError,
    value_object::{Color, LineWidth, StrokeId, Timestamp, UserId, UserName},
};

/// キャンバス座標上の点
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// NaN / 無限大を含む座標は拒否する
    pub fn new(x: f64, y: f64) -> Result<Self, ValueObjectError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ValueObjectError::NonFinitePoint);
        }
        Ok(Self { x, y })
    }
}

/// 描画ツール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Brush,
    Eraser,
}

/// ストローク
///
/// `points` は `finalized == false` の間だけ末尾に追加できる。
/// 点の追加と確定は Drawing State Store を経由してのみ行われる。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub owner_id: UserId,
    pub tool: Tool,
    pub color: Color,
    pub line_width: LineWidth,
    points: Vec<Point>,
    finalized: bool,
    pub created_at: Timestamp,
}

impl Stroke {
    /// 最初の点だけを持つ、未確定のストロークを作成
    pub fn begin(
        id: StrokeId,
        owner_id: UserId,
        tool: Tool,
        color: Color,
        line_width: LineWidth,
        first_point: Point,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner_id,
            tool,
            color,
            line_width,
            points: vec![first_point],
            finalized: false,
            created_at,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    pub(super) fn push_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub(super) fn mark_finalized(&mut self) {
        self.finalized = true;
    }
}

/// ルームに接続中の参加者
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub color: Color,
    pub joined_at: Timestamp,
}

impl User {
    pub fn new(id: UserId, name: UserName, color: Color, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            color,
            joined_at,
        }
    }
}
