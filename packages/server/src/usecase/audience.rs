//! 送信先の選択と送信の共通処理

use sketchroom_shared::protocol::{ServerMessage, UserData};

use crate::{
    domain::{MessagePusher, User, UserId},
    infrastructure::dto::conversion::users_for_viewer,
};

use super::error::SessionError;

/// 自分以外の参加者
pub(super) fn others(users: &[User], me: &UserId) -> Vec<UserId> {
    users
        .iter()
        .filter(|u| &u.id != me)
        .map(|u| u.id.clone())
        .collect()
}

/// 全参加者
pub(super) fn everyone(users: &[User]) -> Vec<UserId> {
    users.iter().map(|u| u.id.clone()).collect()
}

/// 1 人のクライアントへ送信
pub(super) async fn unicast(
    pusher: &dyn MessagePusher,
    to: &UserId,
    message: &ServerMessage,
) -> Result<(), SessionError> {
    let json = message.encode()?;
    pusher.push_to(to, &json).await?;
    Ok(())
}

/// 複数のクライアントへ同じメッセージを送信（送信先が無ければ何もしない）
pub(super) async fn broadcast(
    pusher: &dyn MessagePusher,
    targets: Vec<UserId>,
    message: &ServerMessage,
) -> Result<(), SessionError> {
    if targets.is_empty() {
        return Ok(());
    }
    let json = message.encode()?;
    pusher.broadcast(targets, &json).await?;
    Ok(())
}

/// 受信者ごとに並べ替えたユーザー一覧を含むメッセージを各参加者へ送信
///
/// 1 人への送信に失敗しても残りの参加者には送信を続ける。
pub(super) async fn broadcast_tailored<F>(
    pusher: &dyn MessagePusher,
    users: &[User],
    build: F,
) where
    F: Fn(Vec<UserData>) -> ServerMessage,
{
    for viewer in users {
        let message = build(users_for_viewer(users, viewer));
        if let Err(e) = unicast(pusher, &viewer.id, &message).await {
            tracing::warn!(
                "Failed to send user list to '{}': {}",
                viewer.id.as_str(),
                e
            );
        }
    }
}
