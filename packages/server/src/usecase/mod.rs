//! UseCase layer
//!
//! プロトコルの関心ごとに 1 つのユースケースを定義し、
//! `SessionCoordinator` が接続ごとの状態に応じてそれらを呼び出します。

mod audience;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod draw_stroke;
pub mod edit_history;
pub mod error;
pub mod get_room;
pub mod move_cursor;
pub mod rename_participant;
pub mod room_gate;
pub mod session_coordinator;
#[cfg(test)]
mod testing;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use draw_stroke::{DrawStrokeUseCase, StartStrokeInput};
pub use edit_history::EditHistoryUseCase;
pub use error::{GetRoomDetailError, SessionError};
pub use get_room::GetRoomUseCase;
pub use move_cursor::MoveCursorUseCase;
pub use rename_participant::RenameParticipantUseCase;
pub use room_gate::RoomGate;
pub use session_coordinator::{Session, SessionCoordinator, SessionState};
