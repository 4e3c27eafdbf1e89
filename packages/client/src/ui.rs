//! UI utilities for the client.

use std::io::Write;

/// Prompt shown by the readline loop
pub fn prompt(room: &str) -> String {
    format!("{}> ", room)
}

/// Redisplay the prompt after printing an event
pub fn redisplay_prompt(room: &str) {
    print!("{}", prompt(room));
    std::io::stdout().flush().ok();
}
