//! Code shared by the Sketchroom server and client.
//!
//! - `protocol`: WebSocket wire messages exchanged between a participant and its room
//! - `logger`: tracing subscriber setup
//! - `time`: clock abstraction and timestamp formatting

pub mod logger;
pub mod protocol;
pub mod time;
