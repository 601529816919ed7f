//! Optional flat-file persistence of transcripts.
//!
//! A saved transcript is a JSON array of `{"role","content"}` objects.
//! Loading is deliberately forgiving: a missing or malformed file yields
//! `None` rather than failing the session.

use std::fs;
use std::path::Path;

use crate::error::LlmError;
use crate::types::{ChatMessage, MessageRole};

/// Save a transcript as pretty-printed JSON.
pub fn save_history(messages: &[ChatMessage], path: impl AsRef<Path>) -> Result<(), LlmError> {
    let json = serde_json::to_string_pretty(messages)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a transcript saved by [`save_history`].
///
/// Returns `None` when the file does not exist or does not parse; the cause
/// is logged at warn level and the session carries on.
pub fn load_history(path: impl AsRef<Path>) -> Option<Vec<ChatMessage>> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read history file");
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(messages) => Some(messages),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not parse history file");
            None
        }
    }
}

/// Format a transcript for terminal display, one role-prefixed line per
/// message, in chronological order. System messages are instruction
/// plumbing, not dialogue, and are skipped.
pub fn format_transcript(messages: &[ChatMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let prefix = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => continue,
        };
        out.push('[');
        out.push_str(prefix);
        out.push_str("] ");
        out.push_str(&message.content);
        out.push('\n');
    }
    out
}
