//! Error types for the Sketchroom client.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the room identifier
    #[error("Room '{0}' was rejected by the server")]
    InvalidRoom(String),

    /// The server URL could not be parsed
    #[error("Invalid server URL '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    /// Connection could not be established
    #[error("Connection error: {0}")]
    Connection(String),

    /// The established connection was lost
    #[error("Connection lost")]
    ConnectionLost,

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("Protocol error: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("Readline error: {0}")]
    Readline(String),
}

/// Errors produced while parsing a prompt line
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid point '{0}' (expected x,y)")]
    InvalidPoint(String),

    #[error("invalid tool '{0}' (expected brush or eraser)")]
    InvalidTool(String),

    #[error("invalid width '{0}' (expected a positive number)")]
    InvalidWidth(String),
}
