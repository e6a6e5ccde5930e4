//! # remote-input-core
//!
//! Shared library for the remote input bridge containing the controller-facing
//! frame format, the event payload types, and the key/button name tables.
//!
//! This crate has zero dependencies on OS APIs, async runtimes, or sockets,
//! so both the host service and any controller written in Rust (including the
//! integration tests) can use it.
//!
//! # Architecture overview
//!
//! A *controller* (usually a phone browser acting as a touchpad) sends small
//! JSON events over a WebSocket to the *host*.  The host replays each event as
//! synthetic OS input.
//!
//! - **`protocol`** – The six event kinds, how they look on the wire, and the
//!   lenient field rules that turn missing or malformed fields into neutral
//!   values instead of errors.
//!
//! - **`keymap`** – Translation from the human-readable key names a controller
//!   sends (`"enter"`, `"ctrl"`, `"f5"`, `"a"`) to the typed [`NamedKey`] and
//!   [`PointerButton`] values the host's emulator understands.

pub mod keymap;
pub mod protocol;

pub use keymap::{NamedKey, PointerButton};
pub use protocol::events::{
    KeyCombo, KeyPress, KeyboardText, MouseClick, MouseMove, MouseScroll, RemoteEvent,
};
pub use protocol::frame::{decode_frame, encode_frame, ProtocolError};
