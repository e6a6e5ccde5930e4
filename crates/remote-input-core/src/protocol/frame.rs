//! Frame decoding and encoding.
//!
//! A *frame* is the text content of one WebSocket message.  Two shapes are
//! accepted so that both hand-rolled controllers and Socket.IO-style `emit`
//! payloads work:
//!
//! ```text
//! envelope object:  {"event": "mouse_move", "data": {"dx": 1, "dy": 2}}
//! emit array:       ["mouse_move", {"dx": 1, "dy": 2}]
//! ```
//!
//! `data` (or the second array element) may be omitted entirely; the event
//! then carries neutral values.  Encoding always produces the envelope form.

use serde_json::Value;
use thiserror::Error;
use tracing::trace;

use super::events::RemoteEvent;

/// Payload used when a frame carries no `data`.
static NO_DATA: Value = Value::Null;

/// Errors that can occur while decoding a controller frame.
///
/// None of these are fatal to a session; the host logs them and moves on to
/// the next frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame text is not valid JSON.
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The JSON is valid but is neither an envelope object nor an emit array.
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    /// The event name is not one the host understands.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
}

/// Decodes one frame into a [`RemoteEvent`].
///
/// # Errors
///
/// - [`ProtocolError::InvalidJson`] if `text` does not parse as JSON.
/// - [`ProtocolError::MalformedFrame`] if the JSON has no string event name.
/// - [`ProtocolError::UnknownEvent`] if the name is not a known event.
///
/// Missing or mistyped payload fields are *not* errors.
///
/// # Example
///
/// ```rust
/// use remote_input_core::{decode_frame, RemoteEvent};
///
/// let event = decode_frame(r#"["mouse_scroll", {"dy": 3}]"#).unwrap();
/// assert_eq!(event.name(), "mouse_scroll");
/// ```
pub fn decode_frame(text: &str) -> Result<RemoteEvent, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;
    let (name, data) = split_frame(&value)?;
    trace!(event = name, "decoded frame");
    RemoteEvent::from_parts(name, data)
        .ok_or_else(|| ProtocolError::UnknownEvent(name.to_string()))
}

/// Encodes an event in the envelope-object form.
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidJson`] only if serialization fails, which
/// cannot happen for the finite values the payload types are built from.
pub fn encode_frame(event: &RemoteEvent) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}

/// Splits a parsed frame into its event name and payload.
fn split_frame(value: &Value) -> Result<(&str, &Value), ProtocolError> {
    match value {
        Value::Object(fields) => {
            let name = fields
                .get("event")
                .and_then(Value::as_str)
                .ok_or(ProtocolError::MalformedFrame("missing string 'event' field"))?;
            Ok((name, fields.get("data").unwrap_or(&NO_DATA)))
        }
        Value::Array(items) => {
            let name = items
                .first()
                .and_then(Value::as_str)
                .ok_or(ProtocolError::MalformedFrame("first array element must be the event name"))?;
            Ok((name, items.get(1).unwrap_or(&NO_DATA)))
        }
        _ => Err(ProtocolError::MalformedFrame(
            "frame must be a JSON object or array",
        )),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
