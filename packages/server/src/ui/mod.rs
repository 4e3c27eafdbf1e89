//! Sketchroom server implementation (axum router, WebSocket / HTTP handlers).

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
