//! Value Objects
//!
//! 不変で、値そのものが同一性を表すドメインの型を定義します。
//! 生成時にバリデーションを行い、不正な値はエラーとして返します。

use serde::Serialize;
use uuid::Uuid;

use super::error::ValueObjectError;

/// 識別子の最大長
const MAX_ID_LENGTH: usize = 64;

/// 表示名の最大文字数
pub const MAX_USER_NAME_CHARS: usize = 20;

/// 色文字列の最大長
const MAX_COLOR_LENGTH: usize = 64;

fn validate_id(kind: &'static str, value: &str) -> Result<(), ValueObjectError> {
    if value.is_empty() {
        return Err(ValueObjectError::EmptyId(kind));
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(ValueObjectError::IdTooLong {
            kind,
            max: MAX_ID_LENGTH,
        });
    }
    Ok(())
}

/// ルーム ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RoomId(String);

impl RoomId {
    /// 接続時にルームが指定されなかった場合のルーム
    pub const DEFAULT: &'static str = "default";

    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_id("room", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ユーザー ID（= 接続 ID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_id("user", &value)?;
        Ok(Self(value))
    }

    /// ランダムな UUID v4 から新しい ID を生成
    pub fn generate() -> Self {
        Self::generate_from(Uuid::new_v4())
    }

    pub(super) fn generate_from(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ストローク ID
///
/// ルームの生存期間中に再利用されない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StrokeId(String);

impl StrokeId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        validate_id("stroke", &value)?;
        Ok(Self(value))
    }

    /// ランダムな UUID v4 から新しい ID を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for StrokeId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ユーザーの表示名
///
/// 前後の空白は除去され、空文字列は拒否される。
/// 20 文字を超える部分は切り捨てられる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserName(String);

impl UserName {
    pub fn new(value: &str) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyName);
        }
        Ok(Self(trimmed.chars().take(MAX_USER_NAME_CHARS).collect()))
    }

    /// 生成名が使えない場合の表示名
    pub(super) fn anonymous() -> Self {
        Self("Anonymous".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// CSS 色文字列（例: `#FF6B6B`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Color(String);

impl Color {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ValueObjectError::EmptyColor);
        }
        if value.len() > MAX_COLOR_LENGTH {
            return Err(ValueObjectError::ColorTooLong(MAX_COLOR_LENGTH));
        }
        Ok(Self(value))
    }

    pub(super) fn from_palette(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 線幅（正の有限数）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct LineWidth(f64);

impl LineWidth {
    pub fn new(value: f64) -> Result<Self, ValueObjectError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValueObjectError::InvalidLineWidth(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
