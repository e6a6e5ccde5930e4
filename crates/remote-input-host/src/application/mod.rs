//! Application layer for remote-input-host.
//!
//! - **`dispatch_input`** – Turns one decoded [`remote_input_core::RemoteEvent`]
//!   into exactly one call on a [`PlatformInputEmulator`].  The emulator is
//!   injected at construction time, so the dispatch rules are tested without
//!   touching the real mouse and keyboard.

pub mod dispatch_input;

pub use dispatch_input::{
    DispatchInputUseCase, DispatchOutcome, EmulationError, PlatformInputEmulator, SkipReason,
};
