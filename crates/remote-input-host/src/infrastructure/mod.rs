//! Infrastructure layer for remote-input-host.
//!
//! Handles all I/O: accepting controller WebSocket connections, owning the
//! OS input backend, and reading the optional config file.
//!
//! # Sub-modules
//!
//! - **`ws_server`** – accept loop and per-session frame handling.
//! - **`input_worker`** – a dedicated OS thread that owns the emulator and
//!   processes events in arrival order.
//! - **`input_emulation`** – `PlatformInputEmulator` implementations: the
//!   `enigo`-backed emulator and a recording emulator for tests and dry runs.
//! - **`config_file`** – TOML schema and loader layered under the CLI flags.

pub mod config_file;
pub mod input_emulation;
pub mod input_worker;
pub mod ws_server;

pub use input_worker::{InputWorker, WorkerError};
pub use ws_server::{run_server, serve};
