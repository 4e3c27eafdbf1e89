//! WebSocket wire protocol.
//!
//! Every frame is a JSON text message carrying a `type` discriminator in
//! kebab-case and camelCase fields, e.g.
//!
//! ```json
//! {"type":"move-stroke","strokeId":"4b1f…","point":{"x":10.0,"y":12.5}}
//! ```
//!
//! Anything that does not parse into a known variant with all required fields
//! is rejected by [`ClientMessage::decode`] / [`ServerMessage::decode`].

use serde::{Deserialize, Serialize};

/// Canvas-space coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `false` for NaN or infinite coordinates.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Drawing tool a stroke was made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
}

/// A stroke as seen on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeData {
    pub id: String,
    pub owner_id: String,
    pub tool: Tool,
    pub color: String,
    pub line_width: f64,
    pub points: Vec<Point>,
    pub finalized: bool,
    pub created_at: i64,
}

/// A connected participant as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub color: String,
    pub joined_at: i64,
}

/// Messages sent by a participant to its room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    StartStroke {
        tool: Tool,
        color: String,
        line_width: f64,
        point: Point,
        /// Chosen by the participant and echoed back in `stroke-assigned`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
    MoveStroke {
        stroke_id: String,
        point: Point,
    },
    EndStroke {
        stroke_id: String,
    },
    CursorMove {
        position: Point,
    },
    Undo,
    Redo,
    Clear,
    Rename {
        name: String,
    },
}

impl ClientMessage {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Messages sent by a room to one or more participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Unicast to a participant right after it joins.
    InitialState {
        strokes: Vec<StrokeData>,
        user: UserData,
        users: Vec<UserData>,
    },
    PeerJoined {
        user: UserData,
    },
    UsersChanged {
        users: Vec<UserData>,
    },
    PeerLeft {
        user_id: String,
        users: Vec<UserData>,
    },
    StrokeStarted {
        id: String,
        owner_id: String,
        owner_color: String,
        tool: Tool,
        color: String,
        line_width: f64,
        points: Vec<Point>,
    },
    /// Unicast to the owner of a freshly started stroke.
    StrokeAssigned {
        stroke_id: String,
        /// The `token` of the `start-stroke` this id answers, if it carried one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
    StrokeExtended {
        stroke_id: String,
        point: Point,
    },
    StrokeFinalized {
        stroke_id: String,
    },
    CursorMoved {
        user_id: String,
        user: UserData,
        position: Point,
    },
    StrokeUndone {
        stroke_id: String,
    },
    StrokeRedone {
        stroke_id: String,
    },
    CanvasCleared,
}

impl ServerMessage {
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_start_stroke() {
        // テスト項目: start-stroke が camelCase のフィールドで解析される
        // given (前提条件):
        let text = r##"{"type":"start-stroke","tool":"eraser","color":"#000000","lineWidth":5,"point":{"x":1.5,"y":2}}"##;

        // when (操作):
        let result = ClientMessage::decode(text).unwrap();

        // then (期待する結果):
        assert_eq!(
            result,
            ClientMessage::StartStroke {
                tool: Tool::Eraser,
                color: "#000000".to_string(),
                line_width: 5.0,
                point: Point::new(1.5, 2.0),
                token: None,
            }
        );
    }

    #[test]
    fn test_stroke_token_is_echoed_on_the_wire() {
        // テスト項目: start-stroke の token が解析され、stroke-assigned に token として出力される
        // given (前提条件):
        let text = r##"{"type":"start-stroke","tool":"brush","color":"#000000","lineWidth":2,"point":{"x":0,"y":0},"token":"local-3"}"##;

        // when (操作):
        let start = ClientMessage::decode(text).unwrap();
        let assigned = ServerMessage::StrokeAssigned {
            stroke_id: "s1".to_string(),
            token: Some("local-3".to_string()),
        }
        .encode()
        .unwrap();

        // then (期待する結果):
        assert!(matches!(
            start,
            ClientMessage::StartStroke { token: Some(ref token), .. } if token == "local-3"
        ));
        assert_eq!(
            assigned,
            r#"{"type":"stroke-assigned","strokeId":"s1","token":"local-3"}"#
        );
    }

    #[test]
    fn test_decode_unit_variant_with_empty_body() {
        // テスト項目: フィールドのない undo がそのまま解析される
        // given (前提条件):
        let text = r#"{"type":"undo"}"#;

        // when (操作):
        let result = ClientMessage::decode(text).unwrap();

        // then (期待する結果):
        assert_eq!(result, ClientMessage::Undo);
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        // テスト項目: 未知の type は拒否される
        // given (前提条件):
        let text = r#"{"type":"erase-everything"}"#;

        // when (操作):
        let result = ClientMessage::decode(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        // テスト項目: 必須フィールドが欠けている場合は拒否される
        // given (前提条件):
        let text = r#"{"type":"move-stroke","strokeId":"abc"}"#;

        // when (操作):
        let result = ClientMessage::decode(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_tool() {
        // テスト項目: 未知のツール名は拒否される
        // given (前提条件):
        let text = r##"{"type":"start-stroke","tool":"spray","color":"#fff","lineWidth":5,"point":{"x":0,"y":0}}"##;

        // when (操作):
        let result = ClientMessage::decode(text);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_server_message_uses_wire_names() {
        // テスト項目: ServerMessage が kebab-case の type と camelCase のフィールドで出力される
        // given (前提条件):
        let message = ServerMessage::PeerLeft {
            user_id: "u1".to_string(),
            users: vec![],
        };

        // when (操作):
        let json = message.encode().unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"peer-left","userId":"u1","users":[]}"#);
    }

    #[test]
    fn test_encode_canvas_cleared() {
        // テスト項目: フィールドのない canvas-cleared が type のみで出力される
        // given (前提条件):
        let message = ServerMessage::CanvasCleared;

        // when (操作):
        let json = message.encode().unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"canvas-cleared"}"#);
    }

    #[test]
    fn test_point_is_finite() {
        // テスト項目: NaN や無限大を含む座標は有限でないと判定される
        // given (前提条件):
        let ok = Point::new(1.0, 2.0);
        let nan = Point::new(f64::NAN, 0.0);
        let inf = Point::new(0.0, f64::INFINITY);

        // when (操作) / then (期待する結果):
        assert!(ok.is_finite());
        assert!(!nan.is_finite());
        assert!(!inf.is_finite());
    }
}
