//! 新規ユーザーの生成

use uuid::Uuid;

use super::{
    entity::User,
    value_object::{Color, Timestamp, UserId, UserName},
};

/// 参加者に割り当てる色のパレット
pub const USER_PALETTE: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
];

/// 生成される表示名に含める ID の文字数
const GENERATED_NAME_ID_CHARS: usize = 6;

pub struct UserFactory;

impl UserFactory {
    /// 新しい ID・生成された表示名・パレットから選んだ色を持つユーザーを作成
    ///
    /// 表示名は `User-` + ID の先頭 6 文字。
    pub fn create(joined_at: Timestamp) -> User {
        let uuid = Uuid::new_v4();
        let palette_index = uuid.as_bytes()[0] as usize % USER_PALETTE.len();
        let id = UserId::generate_from(uuid);

        User::new(
            id.clone(),
            Self::generated_name(&id),
            Self::palette_color(palette_index),
            joined_at,
        )
    }

    fn generated_name(id: &UserId) -> UserName {
        let prefix: String = id.as_str().chars().take(GENERATED_NAME_ID_CHARS).collect();
        UserName::new(&format!("User-{}", prefix)).unwrap_or_else(|_| UserName::anonymous())
    }

    fn palette_color(index: usize) -> Color {
        Color::from_palette(USER_PALETTE[index % USER_PALETTE.len()])
    }
}
