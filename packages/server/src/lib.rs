//! Sketchroom synchronization server library.
//!
//! A room-scoped realtime shared-canvas server: authoritative per-room drawing
//! state with global undo/redo, presence, and WebSocket fan-out.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
