//! Controller-facing protocol: event payloads and JSON frame handling.
//!
//! Every controller message is one WebSocket text frame containing one
//! event.  See [`frame`] for the two accepted frame shapes and [`events`] for
//! the payload of each event kind.

pub mod events;
pub mod frame;
pub mod lenient;
