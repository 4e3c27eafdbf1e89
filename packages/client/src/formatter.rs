//! Message formatting utilities for client display.

use sketchroom_shared::{
    protocol::{Tool, UserData},
    time::timestamp_to_jst_rfc3339,
};

use crate::mirror::StrokeStyle;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the user list shown after joining or when presence changes
    ///
    /// # Arguments
    ///
    /// * `users` - Users in the room, own user first
    /// * `me_id` - The current user's ID (to mark as "me")
    pub fn format_users(users: &[UserData], me_id: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str("Users:\n");

        if users.is_empty() {
            output.push_str("(No users)\n");
        } else {
            for user in users {
                let me_suffix = if user.id == me_id { " (me)" } else { "" };
                output.push_str(&format!(
                    "{}{} [{}] - joined at {}\n",
                    user.name,
                    me_suffix,
                    user.color,
                    format_timestamp(user.joined_at)
                ));
            }
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    /// Format the greeting printed once `initial-state` has been applied
    pub fn format_room_joined(room: &str, me: &UserData, visible_strokes: usize) -> String {
        format!(
            "\nJoined room '{}' as {}. {} stroke(s) on the canvas.\n",
            room, me.name, visible_strokes
        )
    }

    /// Format a peer-joined notification
    pub fn format_peer_joined(user: &UserData) -> String {
        format!(
            "\n+ {} entered at {}\n",
            user.name,
            format_timestamp(user.joined_at)
        )
    }

    /// Format a peer-left notification
    pub fn format_peer_left(name: &str) -> String {
        format!("\n- {} left\n", name)
    }

    pub fn format_stroke_started(owner: &str, stroke_id: &str) -> String {
        format!("\n~ {} started stroke {}\n", owner, short_id(stroke_id))
    }

    pub fn format_stroke_undone(stroke_id: &str) -> String {
        format!("\n< stroke {} undone\n", short_id(stroke_id))
    }

    pub fn format_stroke_redone(stroke_id: &str) -> String {
        format!("\n> stroke {} redone\n", short_id(stroke_id))
    }

    pub fn format_canvas_cleared() -> String {
        "\n! canvas cleared\n".to_string()
    }

    /// Format the `status` command output
    pub fn format_status(
        users: &[UserData],
        me_id: &str,
        visible_strokes: usize,
        style: &StrokeStyle,
    ) -> String {
        let mut output = Self::format_users(users, me_id);
        output.push_str(&format!("Visible strokes: {}\n", visible_strokes));
        output.push_str(&format!(
            "Style: {} {} width {}\n",
            tool_name(style.tool),
            style.color,
            style.line_width
        ));
        output.push_str(&format!("{}\n", RULE));
        output
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

fn format_timestamp(timestamp_millis: i64) -> String {
    timestamp_to_jst_rfc3339(timestamp_millis).unwrap_or_else(|| "unknown time".to_string())
}

fn short_id(stroke_id: &str) -> &str {
    stroke_id.get(..8).unwrap_or(stroke_id)
}

fn tool_name(tool: Tool) -> &'static str {
    match tool {
        Tool::Brush => "brush",
        Tool::Eraser => "eraser",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str) -> UserData {
        UserData {
            id: id.to_string(),
            name: name.to_string(),
            color: "#FF6B6B".to_string(),
            // 2023-01-01 00:00:00 JST
            joined_at: 1672498800000,
        }
    }

    #[test]
    fn test_format_users_with_empty_list() {
        // テスト項目: ユーザーが空の場合、適切なメッセージが表示される
        // given (前提条件):
        let users = vec![];

        // when (操作):
        let result = MessageFormatter::format_users(&users, "me");

        // then (期待する結果):
        assert!(result.contains("Users:"));
        assert!(result.contains("(No users)"));
    }

    #[test]
    fn test_format_users_marks_me() {
        // テスト項目: 自分のユーザーに "(me)" が付き、他のユーザーには付かない
        // given (前提条件):
        let users = vec![user("1", "Alice"), user("2", "Bob")];

        // when (操作):
        let result = MessageFormatter::format_users(&users, "1");

        // then (期待する結果):
        assert!(result.contains("Alice (me) [#FF6B6B] - joined at 2023-01-01T00:00:00+09:00"));
        assert!(result.contains("Bob [#FF6B6B]"));
        assert!(!result.contains("Bob (me)"));
    }

    #[test]
    fn test_format_peer_joined() {
        // テスト項目: 参加通知に名前と JST の参加時刻が含まれる
        // given (前提条件):
        let bob = user("2", "Bob");

        // when (操作):
        let result = MessageFormatter::format_peer_joined(&bob);

        // then (期待する結果):
        assert!(result.contains("+ Bob entered at 2023-01-01T00:00:00"));
        assert!(result.contains("+09:00"));
    }

    #[test]
    fn test_format_stroke_events_shorten_ids() {
        // テスト項目: ストロークの通知では ID が先頭 8 文字に短縮される
        // given (前提条件):
        let stroke_id = "0123456789abcdef";

        // when (操作):
        let undone = MessageFormatter::format_stroke_undone(stroke_id);
        let redone = MessageFormatter::format_stroke_redone("abc");

        // then (期待する結果):
        assert_eq!(undone, "\n< stroke 01234567 undone\n");
        assert_eq!(redone, "\n> stroke abc redone\n");
    }

    #[test]
    fn test_format_status() {
        // テスト項目: status にユーザー、表示中のストローク数、描画設定が含まれる
        // given (前提条件):
        let users = vec![user("1", "Alice")];
        let style = StrokeStyle {
            tool: Tool::Eraser,
            color: "#112233".to_string(),
            line_width: 4.0,
        };

        // when (操作):
        let result = MessageFormatter::format_status(&users, "1", 3, &style);

        // then (期待する結果):
        assert!(result.contains("Alice (me)"));
        assert!(result.contains("Visible strokes: 3"));
        assert!(result.contains("Style: eraser #112233 width 4"));
    }

    #[test]
    fn test_format_raw_and_binary_message() {
        // テスト項目: 解析できないメッセージとバイナリの通知
        // given (前提条件):

        // when (操作):
        let raw = MessageFormatter::format_raw_message("hello");
        let binary = MessageFormatter::format_binary_message(42);

        // then (期待する結果):
        assert_eq!(raw, "\n← Received: hello\n");
        assert_eq!(binary, "\n← Received 42 bytes of binary data\n");
    }
}
