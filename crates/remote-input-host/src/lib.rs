//! remote-input-host library crate.
//!
//! The host is the machine being controlled.  A controller (typically a phone
//! browser acting as a touchpad and keyboard) connects over WebSocket and
//! sends small JSON events; the host replays each one as synthetic OS input.
//!
//! # Architecture
//!
//! ```text
//! Controller (JSON over WebSocket)
//!         ↓
//! [remote-input-host]
//!   ├── domain/           HostConfig, DispatchSettings (pure data)
//!   ├── application/      DispatchInputUseCase: one event → one emulator call
//!   └── infrastructure/
//!         ├── ws_server/       accept loop, one task per controller session
//!         ├── input_worker/    OS thread that owns the emulator
//!         ├── input_emulation/ enigo-backed and recording emulators
//!         └── config_file/     optional TOML configuration
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `remote-input-core` only; the OS is
//!   reached through the [`application::PlatformInputEmulator`] trait.
//! - `infrastructure` depends on everything else plus `tokio`, `tungstenite`
//!   and `enigo`.

/// Domain layer: configuration types.
pub mod domain;

/// Application layer: event dispatch.
pub mod application;

/// Infrastructure layer: WebSocket server, input worker, emulators, config file.
pub mod infrastructure;
