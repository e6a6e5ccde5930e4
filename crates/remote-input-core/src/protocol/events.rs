//! Event payload types.
//!
//! Each event kind the controller can send has its own small payload struct.
//! Payloads are transient: they live for exactly one dispatch call on the host
//! and have no identity or relationships.
//!
//! # Serde representation
//!
//! [`RemoteEvent`] serializes in the *envelope* form used on the wire:
//!
//! ```json
//! {"event":"mouse_move","data":{"dx":4.5,"dy":-2.0}}
//! {"event":"keyboard_text","data":{"text":"hello"}}
//! ```
//!
//! Decoding does NOT go through `Deserialize`; it uses the lenient field
//! helpers in [`super::lenient`] so a missing or mistyped field becomes a
//! neutral value instead of a rejected frame.  See [`RemoteEvent::from_parts`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient::{number_field, string_field, string_field_or, string_list_field};

/// Wire name of the relative pointer-motion event.
pub const MOUSE_MOVE: &str = "mouse_move";
/// Wire name of the click event.
pub const MOUSE_CLICK: &str = "mouse_click";
/// Wire name of the vertical scroll event.
pub const MOUSE_SCROLL: &str = "mouse_scroll";
/// Wire name of the single key press event.
pub const KEY_PRESS: &str = "key_press";
/// Wire name of the free-text typing event.
pub const KEYBOARD_TEXT: &str = "keyboard_text";
/// Wire name of the hotkey chord event.
pub const KEY_COMBO: &str = "key_combo";

/// Every event name the host understands, in declaration order.
pub const EVENT_NAMES: [&str; 6] = [
    MOUSE_MOVE,
    MOUSE_CLICK,
    MOUSE_SCROLL,
    KEY_PRESS,
    KEYBOARD_TEXT,
    KEY_COMBO,
];

/// Relative pointer motion in controller pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MouseMove {
    /// Horizontal delta; positive moves right.
    pub dx: f64,
    /// Vertical delta; positive moves down.
    pub dy: f64,
}

/// A single click of one pointer button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseClick {
    /// Button name: `"left"`, `"right"`, or `"middle"` (aliases allowed).
    pub button: String,
}

impl Default for MouseClick {
    fn default() -> Self {
        Self {
            button: "left".to_string(),
        }
    }
}

/// Vertical scroll in wheel clicks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MouseScroll {
    /// Scroll amount; positive scrolls up (away from the user).
    pub dy: f64,
}

/// Press and release of one named key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyPress {
    /// Key name such as `"enter"`, `"backspace"`, `"f5"` or a single character.
    pub key: String,
}

/// Free text to type on the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyboardText {
    pub text: String,
}

/// A hotkey chord, pressed in order and released in reverse.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeyCombo {
    /// Key names, modifiers first: `["ctrl", "shift", "t"]`.
    pub keys: Vec<String>,
}

/// One decoded controller event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RemoteEvent {
    MouseMove(MouseMove),
    MouseClick(MouseClick),
    MouseScroll(MouseScroll),
    KeyPress(KeyPress),
    KeyboardText(KeyboardText),
    KeyCombo(KeyCombo),
}

impl RemoteEvent {
    /// Builds an event from its wire name and raw `data` value.
    ///
    /// Returns `None` only for an unknown event name.  Field problems never
    /// fail: they fall back to the neutral values documented in
    /// [`super::lenient`].  A missing `button` means `"left"`.
    pub fn from_parts(name: &str, data: &Value) -> Option<Self> {
        let event = match name {
            MOUSE_MOVE => Self::MouseMove(MouseMove {
                dx: number_field(data, "dx"),
                dy: number_field(data, "dy"),
            }),
            MOUSE_CLICK => Self::MouseClick(MouseClick {
                button: string_field_or(data, "button", "left"),
            }),
            MOUSE_SCROLL => Self::MouseScroll(MouseScroll {
                dy: number_field(data, "dy"),
            }),
            KEY_PRESS => Self::KeyPress(KeyPress {
                key: string_field(data, "key"),
            }),
            KEYBOARD_TEXT => Self::KeyboardText(KeyboardText {
                text: string_field(data, "text"),
            }),
            KEY_COMBO => Self::KeyCombo(KeyCombo {
                keys: string_list_field(data, "keys"),
            }),
            _ => return None,
        };
        Some(event)
    }

    /// Returns the wire name of this event.
    ///
    /// Used in log messages instead of `Debug` so typed text never ends up in
    /// the host's logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MouseMove(_) => MOUSE_MOVE,
            Self::MouseClick(_) => MOUSE_CLICK,
            Self::MouseScroll(_) => MOUSE_SCROLL,
            Self::KeyPress(_) => KEY_PRESS,
            Self::KeyboardText(_) => KEYBOARD_TEXT,
            Self::KeyCombo(_) => KEY_COMBO,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
