//! Integration tests for the Sketchroom server.
//!
//! The real axum server runs in-process on an ephemeral port and is driven by
//! `tokio-tungstenite` clients and `reqwest`.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use sketchroom_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
    usecase::{GetRoomUseCase, SessionCoordinator},
};
use sketchroom_shared::{
    protocol::{ClientMessage, Point, ServerMessage, Tool},
    time::SystemClock,
};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Helper struct to manage the in-process server lifecycle
struct TestServer {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server on an ephemeral port
    async fn start() -> Self {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let coordinator = Arc::new(SessionCoordinator::new(
            repository.clone(),
            message_pusher,
            Arc::new(SystemClock),
        ));
        let server = Server::new(coordinator, Arc::new(GetRoomUseCase::new(repository)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            server.serve(listener).await.unwrap();
        });

        TestServer { addr, handle }
    }

    /// Get the WebSocket URL for a room
    fn ws_url(&self, room: Option<&str>) -> String {
        match room {
            Some(room) => format!("ws://{}/ws?room={}", self.addr, room),
            None => format!("ws://{}/ws", self.addr),
        }
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct wrapping one WebSocket connection
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.unwrap();
        TestClient { stream }
    }

    async fn send(&mut self, message: &ClientMessage) {
        self.send_raw(&message.encode().unwrap()).await;
    }

    async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    /// Receive the next server message (panics after the timeout)
    async fn recv(&mut self) -> ServerMessage {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a message")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = frame {
                return ServerMessage::decode(&text).unwrap();
            }
        }
    }

    /// Skip messages until one matches
    async fn recv_until<F>(&mut self, matches: F) -> ServerMessage
    where
        F: Fn(&ServerMessage) -> bool,
    {
        loop {
            let message = self.recv().await;
            if matches(&message) {
                return message;
            }
        }
    }

    /// Assert that nothing arrives within `wait`
    async fn expect_silence(&mut self, wait: Duration) {
        if let Ok(Some(Ok(Message::Text(text)))) =
            tokio::time::timeout(wait, self.stream.next()).await
        {
            panic!("unexpected message: {}", text);
        }
    }

    /// Receive initial-state and the first users-changed, return own user id
    async fn handshake(&mut self) -> String {
        let user_id = match self.recv().await {
            ServerMessage::InitialState { user, .. } => user.id,
            other => panic!("expected initial-state, got {:?}", other),
        };
        self.recv_until(|m| matches!(m, ServerMessage::UsersChanged { .. }))
            .await;
        user_id
    }

    async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

fn start_stroke(x: f64, y: f64) -> ClientMessage {
    ClientMessage::StartStroke {
        tool: Tool::Brush,
        color: "#222222".to_string(),
        line_width: 3.0,
        point: Point::new(x, y),
        token: None,
    }
}

async fn assigned_stroke_id(client: &mut TestClient) -> String {
    match client
        .recv_until(|m| matches!(m, ServerMessage::StrokeAssigned { .. }))
        .await
    {
        ServerMessage::StrokeAssigned { stroke_id, .. } => stroke_id,
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: /api/health が ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: serde_json::Value = reqwest::get(server.http_url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_join_sends_initial_state_and_notifies_peers() {
    // テスト項目: 参加すると initial-state が届き、既存の参加者に peer-joined と users-changed が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server.ws_url(None)).await;
    let alice_id = alice.handshake().await;

    // when (操作):
    let mut bob = TestClient::connect(&server.ws_url(None)).await;

    // then (期待する結果):
    let bob_id = match bob.recv().await {
        ServerMessage::InitialState {
            strokes,
            user,
            users,
        } => {
            assert!(strokes.is_empty());
            assert!(user.name.starts_with("User-"));
            assert_eq!(users[0].id, user.id);
            assert_eq!(users.len(), 2);
            user.id
        }
        other => panic!("expected initial-state, got {:?}", other),
    };
    match alice.recv().await {
        ServerMessage::PeerJoined { user } => assert_eq!(user.id, bob_id),
        other => panic!("expected peer-joined, got {:?}", other),
    }
    match alice.recv().await {
        ServerMessage::UsersChanged { users } => {
            assert_eq!(users[0].id, alice_id);
            assert_eq!(users[1].id, bob_id);
        }
        other => panic!("expected users-changed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stroke_is_relayed_and_assigned_to_owner_only() {
    // テスト項目: ストロークが他の参加者に中継され、stroke-assigned は所有者にだけ届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server.ws_url(None)).await;
    let alice_id = alice.handshake().await;
    let mut bob = TestClient::connect(&server.ws_url(None)).await;
    bob.handshake().await;
    alice
        .recv_until(|m| matches!(m, ServerMessage::UsersChanged { .. }))
        .await;

    // when (操作):
    alice.send(&start_stroke(1.0, 1.0)).await;
    let stroke_id = assigned_stroke_id(&mut alice).await;
    alice
        .send(&ClientMessage::MoveStroke {
            stroke_id: stroke_id.clone(),
            point: Point::new(2.0, 2.0),
        })
        .await;
    alice
        .send(&ClientMessage::EndStroke {
            stroke_id: stroke_id.clone(),
        })
        .await;

    // then (期待する結果):
    match bob.recv().await {
        ServerMessage::StrokeStarted {
            id,
            owner_id,
            points,
            ..
        } => {
            assert_eq!(id, stroke_id);
            assert_eq!(owner_id, alice_id);
            assert_eq!(points, vec![Point::new(1.0, 1.0)]);
        }
        other => panic!("expected stroke-started, got {:?}", other),
    }
    assert_eq!(
        bob.recv().await,
        ServerMessage::StrokeExtended {
            stroke_id: stroke_id.clone(),
            point: Point::new(2.0, 2.0),
        }
    );
    assert_eq!(
        bob.recv().await,
        ServerMessage::StrokeFinalized { stroke_id }
    );
    alice.expect_silence(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_stroke_assigned_echoes_token_of_accepted_start_only() {
    // テスト項目: 拒否された start-stroke には応答がなく、受理された start-stroke の token が stroke-assigned で返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server.ws_url(None)).await;
    alice.handshake().await;

    // when (操作): 65 文字の色は拒否される
    alice
        .send(&ClientMessage::StartStroke {
            tool: Tool::Brush,
            color: "#".repeat(65),
            line_width: 3.0,
            point: Point::new(9.0, 9.0),
            token: Some("local-0".to_string()),
        })
        .await;
    alice
        .send(&ClientMessage::StartStroke {
            tool: Tool::Brush,
            color: "#222222".to_string(),
            line_width: 3.0,
            point: Point::new(0.0, 0.0),
            token: Some("local-1".to_string()),
        })
        .await;

    // then (期待する結果):
    match alice.recv().await {
        ServerMessage::StrokeAssigned { token, .. } => {
            assert_eq!(token.as_deref(), Some("local-1"));
        }
        other => panic!("expected stroke-assigned, got {:?}", other),
    }
    alice.expect_silence(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_undo_and_redo_reach_everyone() {
    // テスト項目: 他人のストロークの undo / redo が要求者を含む全員に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server.ws_url(None)).await;
    alice.handshake().await;
    let mut bob = TestClient::connect(&server.ws_url(None)).await;
    bob.handshake().await;
    alice.send(&start_stroke(0.0, 0.0)).await;
    let stroke_id = assigned_stroke_id(&mut alice).await;
    alice
        .send(&ClientMessage::EndStroke {
            stroke_id: stroke_id.clone(),
        })
        .await;
    bob.recv_until(|m| matches!(m, ServerMessage::StrokeFinalized { .. }))
        .await;

    // when (操作):
    bob.send(&ClientMessage::Undo).await;

    // then (期待する結果):
    let undone = ServerMessage::StrokeUndone {
        stroke_id: stroke_id.clone(),
    };
    assert_eq!(bob.recv().await, undone);
    assert_eq!(
        alice
            .recv_until(|m| matches!(m, ServerMessage::StrokeUndone { .. }))
            .await,
        undone
    );

    // when (操作):
    bob.send(&ClientMessage::Redo).await;

    // then (期待する結果):
    let redone = ServerMessage::StrokeRedone { stroke_id };
    assert_eq!(bob.recv().await, redone);
    assert_eq!(alice.recv().await, redone);

    // 履歴が空になった後の redo は誰にも届かない
    bob.send(&ClientMessage::Redo).await;
    bob.expect_silence(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_malformed_message_is_dropped_and_connection_survives() {
    // テスト項目: 不正なメッセージは無視され、接続はそのまま使える
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server.ws_url(None)).await;
    alice.handshake().await;

    // when (操作):
    alice.send_raw("not json").await;
    alice.send_raw(r#"{"type":"move-stroke"}"#).await;
    alice.send_raw(r#"{"type":"teleport"}"#).await;
    alice
        .send(&ClientMessage::Rename {
            name: "Alice".to_string(),
        })
        .await;

    // then (期待する結果):
    match alice.recv().await {
        ServerMessage::UsersChanged { users } => assert_eq!(users[0].name, "Alice"),
        other => panic!("expected users-changed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_disconnect_notifies_remaining_participants() {
    // テスト項目: 切断すると残った参加者に users-changed と peer-left が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server.ws_url(None)).await;
    let alice_id = alice.handshake().await;
    let mut bob = TestClient::connect(&server.ws_url(None)).await;
    let bob_id = bob.handshake().await;

    // when (操作):
    alice.close().await;

    // then (期待する結果):
    match bob
        .recv_until(|m| matches!(m, ServerMessage::PeerLeft { .. }))
        .await
    {
        ServerMessage::PeerLeft { user_id, users } => {
            assert_eq!(user_id, alice_id);
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].id, bob_id);
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_rooms_are_isolated_and_listed() {
    // テスト項目: ルームごとに状態が分かれ、/api/rooms で一覧できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut lobby = TestClient::connect(&server.ws_url(Some("lobby"))).await;
    lobby.handshake().await;
    let mut studio = TestClient::connect(&server.ws_url(Some("studio"))).await;
    studio.handshake().await;

    // when (操作):
    lobby.send(&start_stroke(0.0, 0.0)).await;
    let stroke_id = assigned_stroke_id(&mut lobby).await;
    lobby.send(&ClientMessage::EndStroke { stroke_id }).await;

    // then (期待する結果):
    studio.expect_silence(Duration::from_millis(200)).await;

    let rooms: serde_json::Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms[0]["id"], "lobby");
    assert_eq!(rooms[0]["visibleStrokes"], 1);
    assert_eq!(rooms[1]["id"], "studio");
    assert_eq!(rooms[1]["visibleStrokes"], 0);

    let detail: serde_json::Value = reqwest::get(server.http_url("/api/rooms/lobby"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["undoDepth"], 1);
    assert_eq!(detail["users"].as_array().unwrap().len(), 1);

    let missing = reqwest::get(server.http_url("/api/rooms/nowhere"))
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_room_is_rejected() {
    // テスト項目: 長すぎるルーム ID での接続は拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let room = "r".repeat(65);

    // when (操作):
    let result = connect_async(server.ws_url(Some(&room))).await;

    // then (期待する結果):
    assert!(result.is_err());
}

#[tokio::test]
async fn test_late_joiner_sees_finalized_strokes_only() {
    // テスト項目: 後から参加した人には確定済みのストロークだけが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server.ws_url(None)).await;
    alice.handshake().await;
    alice.send(&start_stroke(0.0, 0.0)).await;
    let finished = assigned_stroke_id(&mut alice).await;
    alice
        .send(&ClientMessage::EndStroke {
            stroke_id: finished.clone(),
        })
        .await;
    alice.send(&start_stroke(5.0, 5.0)).await;
    assigned_stroke_id(&mut alice).await;

    // when (操作):
    let mut carol = TestClient::connect(&server.ws_url(None)).await;

    // then (期待する結果):
    match carol.recv().await {
        ServerMessage::InitialState { strokes, .. } => {
            assert_eq!(strokes.len(), 1);
            assert_eq!(strokes[0].id, finished);
            assert!(strokes[0].finalized);
        }
        other => panic!("expected initial-state, got {:?}", other),
    }
}
