//! Sketchroom synchronization server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sketchroom-server
//! cargo run --bin sketchroom-server -- --host 0.0.0.0 --port 3000
//! PORT=4000 cargo run --bin sketchroom-server
//! ```

use std::sync::Arc;

use clap::Parser;
use sketchroom_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::Server,
    usecase::{GetRoomUseCase, SessionCoordinator},
};
use sketchroom_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "sketchroom-server")]
#[command(about = "Shared realtime canvas synchronization server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory, every room is created on first join)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create UseCases
    let coordinator = Arc::new(SessionCoordinator::new(
        repository.clone(),
        message_pusher,
        Arc::new(SystemClock),
    ));
    let get_room_usecase = Arc::new(GetRoomUseCase::new(repository));

    // 4. Create and run the server
    let server = Server::new(coordinator, get_room_usecase);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
