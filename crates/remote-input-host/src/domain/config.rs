//! Host configuration types.
//!
//! [`HostConfig`] is the single source of truth for runtime settings.  It is
//! built once at startup (defaults, then the optional TOML file, then CLI
//! flags) and shared read-only with every session.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default WebSocket port.  Existing touchpad controller pages
/// expect the host on this port.
pub const DEFAULT_PORT: u16 = 5001;

/// Default upper bound for one WebSocket message.  Events are tiny; the
/// typed-text length is bounded separately by [`DEFAULT_MAX_TEXT_CHARS`].
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024;

/// Default cap on characters in one `keyboard_text` event.
///
/// All sessions share one input thread and typing is not interruptible, so at
/// the default 10 ms interval this keeps one event under about ten seconds.
/// Longer text is skipped rather than truncated.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 1024;

/// Default pause between characters when typing text.
pub const DEFAULT_TYPING_INTERVAL: Duration = Duration::from_millis(10);

/// Settings that change how an event is turned into an emulator call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchSettings {
    /// Multiplier applied to pointer deltas before truncating to pixels.
    ///
    /// Controllers usually apply their own sensitivity; this is a host-side
    /// adjustment for high-DPI displays.
    pub pointer_scale: f64,

    /// Flip the scroll direction (natural scrolling).
    pub invert_scroll: bool,

    /// Longest `keyboard_text` that is typed; longer text is skipped.
    pub max_text_chars: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            pointer_scale: 1.0,
            invert_scroll: false,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
        }
    }
}

/// All runtime configuration for the host.
///
/// # Example
///
/// ```rust
/// use remote_input_host::domain::HostConfig;
///
/// let cfg = HostConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 5001);
/// assert!(!cfg.close_on_error);
/// ```
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Address the WebSocket server binds to.
    ///
    /// `0.0.0.0` accepts controllers from the LAN, which is the normal setup
    /// for a phone on the same Wi-Fi network.
    pub bind_addr: SocketAddr,

    /// Maximum size of one WebSocket message in bytes.
    pub max_message_bytes: usize,

    /// Close the session when an emulator call fails.
    ///
    /// When `false` (the default) failures are logged and the session keeps
    /// going.
    pub close_on_error: bool,

    /// Pause between characters of a `keyboard_text` event.  Zero types the
    /// whole string in one call.
    pub typing_interval: Duration,

    /// Event → emulator call adjustments.
    pub dispatch: DispatchSettings,

    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Record input instead of injecting it.
    pub dry_run: bool,
}

impl Default for HostConfig {
    /// | Field             | Default          |
    /// |-------------------|------------------|
    /// | bind_addr         | `0.0.0.0:5001`   |
    /// | max_message_bytes | 64 KiB           |
    /// | close_on_error    | `false`          |
    /// | typing_interval   | 10 ms            |
    /// | pointer_scale     | `1.0`            |
    /// | invert_scroll     | `false`          |
    /// | max_text_chars    | 1024             |
    /// | log_level         | `"info"`         |
    /// | dry_run           | `false`          |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            close_on_error: false,
            typing_interval: DEFAULT_TYPING_INTERVAL,
            dispatch: DispatchSettings::default(),
            log_level: "info".to_string(),
            dry_run: false,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
