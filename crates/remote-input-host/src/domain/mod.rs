//! Domain layer for remote-input-host.
//!
//! Plain data with no dependencies on I/O, networking, or the OS.  The
//! infrastructure layer is responsible for populating these structs from CLI
//! arguments, environment variables, and the optional config file.

pub mod config;

pub use config::{DispatchSettings, HostConfig};
