//! Input emulation implementations.
//!
//! - [`enigo_backend::EnigoEmulator`] injects real OS input through the
//!   `enigo` crate (SendInput on Windows, CoreGraphics on macOS, XTest or
//!   libei on Linux).
//! - [`mock::RecordingEmulator`] records every call; used by tests and by
//!   `--dry-run`.

pub mod enigo_backend;
pub mod mock;

pub use enigo_backend::EnigoEmulator;
pub use mock::{EmulatedAction, RecordingEmulator};
