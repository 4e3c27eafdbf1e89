//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sketchroom_shared::protocol::{ClientMessage, ServerMessage, UserData};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    command::{self, Command, HELP},
    error::ClientError,
    formatter::MessageFormatter,
    mirror::ClientMirror,
    render::{Renderer, TracingRenderer},
    ui::{prompt, redisplay_prompt},
};

type SharedMirror = Arc<Mutex<ClientMirror<TracingRenderer>>>;

/// Spawn the blocking readline thread feeding prompt lines into a channel.
///
/// The thread outlives individual sessions so reconnecting does not start a
/// second reader on stdin. The channel closes on Ctrl+C or Ctrl+D.
pub fn spawn_readline(room: &str) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = prompt(room);

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Run one WebSocket client session
///
/// Returns `Ok(())` when the user ends the prompt, and an error when the
/// connection could not be established or was lost.
pub async fn run_client_session(
    url: &str,
    room: &str,
    name: Option<&str>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let url = room_url(url, room)?;

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response)) if response.status().as_u16() == 400 => {
            return Err(ClientError::InvalidRoom(room.to_string()));
        }
        Err(e) => return Err(ClientError::Connection(e.to_string())),
    };

    tracing::info!("Connected to {}", url);
    println!(
        "\nYou are in room '{}'. Type 'help' for commands. Press Ctrl+C to exit.\n",
        room
    );

    let (mut write, mut read) = ws_stream.split();
    let mirror: SharedMirror = Arc::new(Mutex::new(ClientMirror::new(TracingRenderer::new())));
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientMessage>();

    // Outbound messages are written in the order the mirror produced them
    let mut write_task = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            let json = match message.encode() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };
            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                break;
            }
        }
    });

    let mirror_for_read = mirror.clone();
    let out_tx_for_read = out_tx.clone();
    let room_for_read = room.to_string();
    let mut pending_name = name.map(str::to_string);
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let message = match ServerMessage::decode(&text) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::debug!("Undecodable server message: {}", e);
                            print!("{}", MessageFormatter::format_raw_message(&text));
                            redisplay_prompt(&room_for_read);
                            continue;
                        }
                    };
                    let joined = matches!(message, ServerMessage::InitialState { .. });

                    let (follow_ups, notice) = {
                        let mut mirror = mirror_for_read.lock().await;
                        apply_and_describe(&mut *mirror, message, &room_for_read)
                    };
                    for follow_up in follow_ups {
                        out_tx_for_read.send(follow_up).ok();
                    }
                    if joined && let Some(name) = pending_name.take() {
                        out_tx_for_read.send(ClientMessage::Rename { name }).ok();
                    }
                    if let Some(notice) = notice {
                        print!("{}", notice);
                        redisplay_prompt(&room_for_read);
                    }
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&room_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut read_task => {
                write_task.abort();
                return Err(ClientError::ConnectionLost);
            }
            _ = &mut write_task => {
                read_task.abort();
                return Err(ClientError::ConnectionLost);
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    write_task.abort();
                    return Ok(());
                };
                let output = match command::parse(&line) {
                    Ok(command) => {
                        let mut mirror = mirror.lock().await;
                        let (messages, output) = execute_command(&mut *mirror, command);
                        for message in messages {
                            out_tx.send(message).ok();
                        }
                        output
                    }
                    Err(e) => Some(format!("{}\n", e)),
                };
                if let Some(output) = output {
                    print!("{}", output);
                }
                redisplay_prompt(room);
            }
        }
    }
}

/// Apply a server message to the mirror and build the terminal notice for it
fn apply_and_describe<R: Renderer>(
    mirror: &mut ClientMirror<R>,
    message: ServerMessage,
    room: &str,
) -> (Vec<ClientMessage>, Option<String>) {
    let notice = match &message {
        ServerMessage::PeerJoined { user } => Some(MessageFormatter::format_peer_joined(user)),
        ServerMessage::PeerLeft { user_id, .. } => Some(MessageFormatter::format_peer_left(
            &display_name(mirror.users(), user_id),
        )),
        ServerMessage::StrokeStarted { id, owner_id, .. } => Some(
            MessageFormatter::format_stroke_started(&display_name(mirror.users(), owner_id), id),
        ),
        ServerMessage::StrokeUndone { stroke_id } => {
            Some(MessageFormatter::format_stroke_undone(stroke_id))
        }
        ServerMessage::StrokeRedone { stroke_id } => {
            Some(MessageFormatter::format_stroke_redone(stroke_id))
        }
        ServerMessage::CanvasCleared => Some(MessageFormatter::format_canvas_cleared()),
        _ => None,
    };
    let joined = matches!(message, ServerMessage::InitialState { .. });
    let refreshes_users = joined || matches!(message, ServerMessage::UsersChanged { .. });

    let follow_ups = mirror.apply(message);

    if !refreshes_users {
        return (follow_ups, notice);
    }
    let me_id = mirror.me().map(|me| me.id.clone()).unwrap_or_default();
    let mut output = String::new();
    if joined && let Some(me) = mirror.me() {
        output.push_str(&MessageFormatter::format_room_joined(
            room,
            me,
            mirror.visible_strokes().len(),
        ));
    }
    output.push_str(&MessageFormatter::format_users(mirror.users(), &me_id));
    (follow_ups, Some(output))
}

/// Drive the mirror from a prompt command
fn execute_command<R: Renderer>(
    mirror: &mut ClientMirror<R>,
    command: Command,
) -> (Vec<ClientMessage>, Option<String>) {
    match command {
        Command::Draw(points) => {
            let mut messages = Vec::new();
            let mut points = points.into_iter();
            if let Some(first) = points.next() {
                messages.extend(mirror.begin_local_stroke(first));
                for point in points {
                    messages.extend(mirror.extend_local_stroke(point));
                }
                messages.extend(mirror.end_local_stroke());
            }
            (messages, None)
        }
        Command::Cursor(position) => (vec![ClientMessage::CursorMove { position }], None),
        Command::Undo => (vec![ClientMessage::Undo], None),
        Command::Redo => (vec![ClientMessage::Redo], None),
        Command::Clear => (vec![ClientMessage::Clear], None),
        Command::Name(name) => (vec![ClientMessage::Rename { name }], None),
        Command::Tool(tool) => {
            mirror.set_tool(tool);
            (Vec::new(), None)
        }
        Command::Color(color) => {
            mirror.set_color(color);
            (Vec::new(), None)
        }
        Command::Width(width) => {
            mirror.set_line_width(width);
            (Vec::new(), None)
        }
        Command::Status => {
            let me_id = mirror.me().map(|me| me.id.as_str()).unwrap_or_default();
            let status = MessageFormatter::format_status(
                mirror.users(),
                me_id,
                mirror.visible_strokes().len(),
                mirror.style(),
            );
            (Vec::new(), Some(status))
        }
        Command::Help => (Vec::new(), Some(HELP.to_string())),
    }
}

/// Append the room as a percent-encoded `room` query parameter
fn room_url(base: &str, room: &str) -> Result<String, ClientError> {
    let mut url =
        url::Url::parse(base).map_err(|e| ClientError::InvalidUrl(base.to_string(), e))?;
    url.query_pairs_mut().append_pair("room", room);
    Ok(url.into())
}

fn display_name(users: &[UserData], user_id: &str) -> String {
    users
        .iter()
        .find(|user| user.id == user_id)
        .map(|user| user.name.clone())
        .unwrap_or_else(|| user_id.get(..6).unwrap_or(user_id).to_string())
}
