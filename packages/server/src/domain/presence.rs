//! Presence Registry
//!
//! ルームごとの接続中ユーザー（表示名・色）を管理します。
//! 最後のユーザーが退出したルームのエントリは削除されます。

use std::collections::HashMap;

use super::{
    entity::User,
    error::PresenceError,
    value_object::{RoomId, UserId, UserName},
};

/// 1 ルーム分の在室ユーザー
#[derive(Debug, Clone, Default)]
pub struct RoomPresence {
    users: Vec<User>,
}

impl RoomPresence {
    /// 同じ ID のユーザーが既に居る場合は置き換える
    pub fn join(&mut self, user: User) {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    pub fn leave(&mut self, user_id: &UserId) -> Option<User> {
        let index = self.users.iter().position(|u| &u.id == user_id)?;
        Some(self.users.remove(index))
    }

    pub fn rename(&mut self, user_id: &UserId, name: UserName) -> Result<User, PresenceError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| &u.id == user_id)
            .ok_or_else(|| PresenceError::UnknownUser(user_id.as_str().to_string()))?;
        user.name = name;
        Ok(user.clone())
    }

    pub fn get(&self, user_id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == user_id)
    }

    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// 全ルームの在室ユーザー
#[derive(Debug, Clone, Default)]
pub struct PresenceRegistry {
    rooms: HashMap<RoomId, RoomPresence>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// ルームが無ければ作成してからユーザーを登録
    pub fn join(&mut self, room_id: &RoomId, user: User) {
        self.rooms.entry(room_id.clone()).or_default().join(user);
    }

    /// ユーザーを削除し、空になったルームのエントリも削除
    pub fn leave(&mut self, room_id: &RoomId, user_id: &UserId) -> Result<User, PresenceError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| PresenceError::RoomNotFound(room_id.as_str().to_string()))?;
        let user = room
            .leave(user_id)
            .ok_or_else(|| PresenceError::UnknownUser(user_id.as_str().to_string()))?;
        if room.is_empty() {
            self.rooms.remove(room_id);
        }
        Ok(user)
    }

    /// 表示名を変更（前後の空白を除去し、20 文字に切り詰める）
    pub fn rename(
        &mut self,
        room_id: &RoomId,
        user_id: &UserId,
        new_name: &str,
    ) -> Result<User, PresenceError> {
        let name = UserName::new(new_name)?;
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| PresenceError::RoomNotFound(room_id.as_str().to_string()))?
            .rename(user_id, name)
    }

    pub fn user(&self, room_id: &RoomId, user_id: &UserId) -> Option<&User> {
        self.rooms.get(room_id)?.get(user_id)
    }

    /// 在室ユーザー一覧（順序は保証しない）
    pub fn list(&self, room_id: &RoomId) -> Vec<User> {
        self.rooms
            .get(room_id)
            .map(|room| room.list().to_vec())
            .unwrap_or_default()
    }

    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}

/// 受信者ごとに並べ替えたユーザー一覧を作成
///
/// 受信者自身が先頭、残りは表示名順（同名なら ID 順）。
pub fn sort_for_viewer(mut users: Vec<User>, viewer: &UserId) -> Vec<User> {
    users.sort_by(|a, b| {
        (&a.id != viewer, a.name.as_str(), a.id.as_str()).cmp(&(
            &b.id != viewer,
            b.name.as_str(),
            b.id.as_str(),
        ))
    });
    users
}
