//! Sketchroom terminal client.
//!
//! Joins a canvas room, mirrors its strokes and presence, and reads drawing
//! commands from a prompt. Reconnects on disconnection (max 5 attempts with
//! 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sketchroom-client -- --room lobby --name Alice
//! cargo run --bin sketchroom-client -- -r lobby
//! ```

use clap::Parser;

use sketchroom_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sketchroom-client")]
#[command(about = "Terminal participant for a Sketchroom canvas room", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,

    /// Room to join
    #[arg(short = 'r', long, default_value = "default")]
    room: String,

    /// Display name to use after joining
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = sketchroom_client::run_client(args.url, args.room, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
