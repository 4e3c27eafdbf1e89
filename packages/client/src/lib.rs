//! Terminal participant for a Sketchroom canvas room.
//!
//! - `mirror`: local replica of the room, rendering through a [`render::Renderer`]
//! - `session` / `runner`: WebSocket connection with reconnection
//! - `command` / `formatter`: prompt input and terminal output

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod mirror;
pub mod render;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
