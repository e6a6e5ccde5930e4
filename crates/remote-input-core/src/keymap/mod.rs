//! Key-name and button-name translation tables.
//!
//! Controllers identify keys by short human-readable names, the same names
//! desktop-automation tools such as pyautogui use: `"enter"`, `"backspace"`,
//! `"ctrl"`, `"f5"`, or a single printable character.  This module turns those
//! names into the typed [`NamedKey`] the host's emulator consumes.
//!
//! Matching is case-insensitive for multi-character names.  A single-character
//! name is taken literally (`"A"` types an upper-case A), except for the
//! whitespace characters that have a named-key equivalent.

use serde::{Deserialize, Serialize};

/// A key the host knows how to press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Enter,
    Backspace,
    Space,
    Tab,
    Escape,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Insert,
    PrintScreen,
    Pause,
    NumLock,
    ScrollLock,
    /// The context-menu ("apps") key.
    Menu,
    VolumeUp,
    VolumeDown,
    VolumeMute,
    PlayPause,
    NextTrack,
    PrevTrack,
    /// Function key `F1` through `F24`.
    Function(u8),
    Shift,
    Control,
    Alt,
    /// Command on macOS, the Windows key elsewhere.
    Meta,
    CapsLock,
    /// Any printable character, typed as-is.
    Char(char),
}

impl NamedKey {
    /// Resolves a controller key name.
    ///
    /// Returns `None` for an empty or unrecognised name; the host treats that
    /// as "press nothing".
    ///
    /// # Example
    ///
    /// ```rust
    /// use remote_input_core::NamedKey;
    ///
    /// assert_eq!(NamedKey::from_name("Return"), Some(NamedKey::Enter));
    /// assert_eq!(NamedKey::from_name("cmd"), Some(NamedKey::Meta));
    /// assert_eq!(NamedKey::from_name("Q"), Some(NamedKey::Char('Q')));
    /// assert_eq!(NamedKey::from_name(""), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let (Some(only), None) = (chars.next(), chars.next()) {
            return Some(match only {
                '\n' | '\r' => Self::Enter,
                '\t' => Self::Tab,
                ' ' => Self::Space,
                other => Self::Char(other),
            });
        }

        let lowered = name.trim().to_ascii_lowercase();
        let key = match lowered.as_str() {
            "enter" | "return" => Self::Enter,
            "backspace" => Self::Backspace,
            "space" | "spacebar" => Self::Space,
            "tab" => Self::Tab,
            "esc" | "escape" => Self::Escape,
            "delete" | "del" => Self::Delete,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" | "pgup" => Self::PageUp,
            "pagedown" | "pgdn" => Self::PageDown,
            "up" | "arrowup" => Self::Up,
            "down" | "arrowdown" => Self::Down,
            "left" | "arrowleft" => Self::Left,
            "right" | "arrowright" => Self::Right,
            "shift" | "shiftleft" | "shiftright" => Self::Shift,
            "ctrl" | "control" | "ctrlleft" | "ctrlright" => Self::Control,
            "alt" | "altleft" | "altright" | "option" | "optionleft" | "optionright" => Self::Alt,
            "command" | "cmd" | "win" | "winleft" | "winright" | "super" | "meta" => Self::Meta,
            "capslock" => Self::CapsLock,
            "insert" | "ins" => Self::Insert,
            "printscreen" | "prntscrn" | "prtsc" | "prtscr" | "print" => Self::PrintScreen,
            "pause" | "break" => Self::Pause,
            "numlock" => Self::NumLock,
            "scrolllock" => Self::ScrollLock,
            "apps" | "menu" => Self::Menu,
            "volumeup" => Self::VolumeUp,
            "volumedown" => Self::VolumeDown,
            "volumemute" | "mute" => Self::VolumeMute,
            "playpause" => Self::PlayPause,
            "nexttrack" => Self::NextTrack,
            "prevtrack" => Self::PrevTrack,
            other => return function_key(other),
        };
        Some(key)
    }
}

/// Parses `f1` … `f24`.
fn function_key(name: &str) -> Option<NamedKey> {
    let number: u8 = name.strip_prefix('f')?.parse().ok()?;
    (1..=24).contains(&number).then_some(NamedKey::Function(number))
}

/// A pointer button the host can click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

impl PointerButton {
    /// Resolves a controller button name, case-insensitively.
    ///
    /// An empty name means the left button, matching a click event that
    /// omits the field.  Any other unrecognised name returns `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "left" | "primary" => Some(Self::Left),
            "right" | "secondary" => Some(Self::Right),
            "middle" | "wheel" => Some(Self::Middle),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
