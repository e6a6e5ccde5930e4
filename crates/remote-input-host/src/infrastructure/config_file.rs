//! Optional TOML config file.
//!
//! Every key is optional.  Keys that are present override the built-in
//! defaults; CLI flags override both.
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0"
//! port = 5001
//! max_message_bytes = 65536
//!
//! [input]
//! pointer_scale = 1.5
//! invert_scroll = false
//! typing_interval_ms = 10
//! max_text_chars = 1024
//! close_on_error = false
//! dry_run = false
//!
//! [logging]
//! level = "info"
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::HostConfig;

/// Error type for loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ── File schema ───────────────────────────────────────────────────────────────

/// Top-level layout of the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerSection,
    pub input: InputSection,
    pub logging: LoggingSection,
}

/// `[server]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// IP address to listen on.  `"0.0.0.0"` binds all interfaces.
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub max_message_bytes: Option<usize>,
}

/// `[input]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputSection {
    pub pointer_scale: Option<f64>,
    pub invert_scroll: Option<bool>,
    pub typing_interval_ms: Option<u64>,
    pub max_text_chars: Option<usize>,
    pub close_on_error: Option<bool>,
    pub dry_run: Option<bool>,
}

/// `[logging]` table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// `tracing` level used when `RUST_LOG` is not set.
    pub level: Option<String>,
}

impl FileConfig {
    /// Overwrites the fields of `config` that this file sets.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `bind_address` is not an IP address.
    pub fn apply_to(&self, config: &mut HostConfig) -> Result<(), ConfigError> {
        if let Some(addr) = &self.server.bind_address {
            let ip: IpAddr = addr.parse().map_err(|_| {
                ConfigError::Invalid(format!("bind_address {addr:?} is not an IP address"))
            })?;
            config.bind_addr = SocketAddr::new(ip, config.bind_addr.port());
        }
        if let Some(port) = self.server.port {
            config.bind_addr.set_port(port);
        }
        if let Some(max) = self.server.max_message_bytes {
            config.max_message_bytes = max;
        }

        if let Some(scale) = self.input.pointer_scale {
            config.dispatch.pointer_scale = scale;
        }
        if let Some(invert) = self.input.invert_scroll {
            config.dispatch.invert_scroll = invert;
        }
        if let Some(ms) = self.input.typing_interval_ms {
            config.typing_interval = Duration::from_millis(ms);
        }
        if let Some(max) = self.input.max_text_chars {
            config.dispatch.max_text_chars = max;
        }
        if let Some(close) = self.input.close_on_error {
            config.close_on_error = close;
        }
        if let Some(dry_run) = self.input.dry_run {
            config.dry_run = dry_run;
        }

        if let Some(level) = &self.logging.level {
            config.log_level = level.clone();
        }
        Ok(())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, or
/// [`ConfigError::Parse`] if it is not valid TOML for this schema.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

/// Parses config TOML from a string.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] on malformed TOML, wrong value types or
/// unknown keys.
pub fn parse_config(text: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Checks the values that cannot be expressed in the type system.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the pointer scale is not a positive
/// finite number or a size limit is zero.
pub fn validate(config: &HostConfig) -> Result<(), ConfigError> {
    let scale = config.dispatch.pointer_scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "pointer_scale must be a positive number, got {scale}"
        )));
    }
    if config.max_message_bytes == 0 {
        return Err(ConfigError::Invalid(
            "max_message_bytes must be greater than zero".to_string(),
        ));
    }
    if config.dispatch.max_text_chars == 0 {
        return Err(ConfigError::Invalid(
            "max_text_chars must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
