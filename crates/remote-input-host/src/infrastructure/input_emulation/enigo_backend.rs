//! OS input emulation via the `enigo` crate.
//!
//! `enigo` wraps each platform's synthetic-input API behind one interface:
//!
//! | Platform | Backend                                  |
//! |----------|------------------------------------------|
//! | Windows  | `SendInput`                              |
//! | macOS    | CoreGraphics `CGEvent` (needs Accessibility permission) |
//! | Linux    | XTest on X11, libei on Wayland           |
//!
//! # Scroll direction
//!
//! The controller protocol treats positive scroll as "up" (away from the
//! user).  `enigo` treats a positive vertical length as "down", so the sign is
//! flipped here.
//!
//! # Text typing
//!
//! With a zero typing interval the whole string goes through
//! `Keyboard::text` in one call.  Otherwise each character is sent as its own
//! key click with a pause in between, which keeps slow remote-desktop or
//! terminal applications from dropping characters.

use std::thread;
use std::time::Duration;

use enigo::{
    Axis, Button, Coordinate, Direction, Enigo, InputError, Key, Keyboard, Mouse, Settings,
};
use remote_input_core::{NamedKey, PointerButton};
use tracing::{debug, warn};

use crate::application::{EmulationError, PlatformInputEmulator};

/// `enigo`-backed implementation of [`PlatformInputEmulator`].
///
/// `Enigo` holds a connection to the display server and is not `Send` on
/// every platform, so this type is always constructed on the input worker
/// thread that uses it.
pub struct EnigoEmulator {
    enigo: Enigo,
    typing_interval: Duration,
}

impl EnigoEmulator {
    /// Connects to the platform input backend.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError::Unavailable`] if no backend can be opened,
    /// for example when no display server is reachable.
    pub fn new(typing_interval: Duration) -> Result<Self, EmulationError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| EmulationError::Unavailable(e.to_string()))?;
        debug!(?typing_interval, "enigo input backend ready");
        Ok(Self {
            enigo,
            typing_interval,
        })
    }

    fn click_key(&mut self, key: Key) -> Result<(), EmulationError> {
        self.enigo.key(key, Direction::Click).map_err(platform)
    }
}

impl PlatformInputEmulator for EnigoEmulator {
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<(), EmulationError> {
        self.enigo
            .move_mouse(dx, dy, Coordinate::Rel)
            .map_err(platform)
    }

    fn click(&mut self, button: PointerButton) -> Result<(), EmulationError> {
        self.enigo
            .button(to_enigo_button(button), Direction::Click)
            .map_err(platform)
    }

    fn scroll(&mut self, clicks: i32) -> Result<(), EmulationError> {
        if clicks == 0 {
            return Ok(());
        }
        self.enigo
            .scroll(clicks.saturating_neg(), Axis::Vertical)
            .map_err(platform)
    }

    fn press_key(&mut self, key: NamedKey) -> Result<(), EmulationError> {
        let key = to_enigo_key(key)?;
        self.click_key(key)
    }

    fn type_text(&mut self, text: &str) -> Result<(), EmulationError> {
        if self.typing_interval.is_zero() {
            return self.enigo.text(text).map_err(platform);
        }
        for ch in text.chars() {
            let key = match ch {
                '\n' => Key::Return,
                '\t' => Key::Tab,
                '\r' => continue,
                other => Key::Unicode(other),
            };
            self.click_key(key)?;
            thread::sleep(self.typing_interval);
        }
        Ok(())
    }

    fn key_combo(&mut self, keys: &[NamedKey]) -> Result<(), EmulationError> {
        let keys = keys
            .iter()
            .map(|k| to_enigo_key(*k))
            .collect::<Result<Vec<_>, _>>()?;

        let mut held = Vec::with_capacity(keys.len());
        let mut outcome = Ok(());
        for key in &keys {
            if let Err(e) = self.enigo.key(*key, Direction::Press) {
                outcome = Err(platform(e));
                break;
            }
            held.push(*key);
        }

        // Release whatever went down, even after a failed press, so no
        // modifier stays stuck on the host.
        for key in held.iter().rev() {
            if let Err(e) = self.enigo.key(*key, Direction::Release) {
                warn!("failed to release {key:?}: {e}");
                if outcome.is_ok() {
                    outcome = Err(platform(e));
                }
            }
        }
        outcome
    }
}

fn platform(err: InputError) -> EmulationError {
    EmulationError::Platform(err.to_string())
}

/// Maps a pointer button to the `enigo` button.
pub fn to_enigo_button(button: PointerButton) -> Button {
    match button {
        PointerButton::Left => Button::Left,
        PointerButton::Right => Button::Right,
        PointerButton::Middle => Button::Middle,
    }
}

/// Maps a named key to the `enigo` key.
///
/// # Errors
///
/// Returns [`EmulationError::Platform`] for a key this platform's keyboard
/// does not have (e.g. `Insert` or `F21` on macOS) and for a function key
/// outside `F1..=F24`, which the keymap never produces.
pub fn to_enigo_key(key: NamedKey) -> Result<Key, EmulationError> {
    let mapped = match key {
        NamedKey::Enter => Key::Return,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Space => Key::Space,
        NamedKey::Tab => Key::Tab,
        NamedKey::Escape => Key::Escape,
        NamedKey::Delete => Key::Delete,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,
        NamedKey::Up => Key::UpArrow,
        NamedKey::Down => Key::DownArrow,
        NamedKey::Left => Key::LeftArrow,
        NamedKey::Right => Key::RightArrow,
        NamedKey::Shift => Key::Shift,
        NamedKey::Control => Key::Control,
        NamedKey::Alt => Key::Alt,
        NamedKey::Meta => Key::Meta,
        NamedKey::CapsLock => Key::CapsLock,
        NamedKey::VolumeUp => Key::VolumeUp,
        NamedKey::VolumeDown => Key::VolumeDown,
        NamedKey::VolumeMute => Key::VolumeMute,
        NamedKey::PlayPause => Key::MediaPlayPause,
        NamedKey::NextTrack => Key::MediaNextTrack,
        NamedKey::PrevTrack => Key::MediaPrevTrack,
        NamedKey::Char(c) => Key::Unicode(c),
        NamedKey::Function(n) => function_key(n)?,
        NamedKey::Insert
        | NamedKey::PrintScreen
        | NamedKey::Pause
        | NamedKey::NumLock
        | NamedKey::ScrollLock
        | NamedKey::Menu => lock_or_system_key(key).ok_or_else(|| unavailable_key(key))?,
    };
    Ok(mapped)
}

fn unavailable_key(key: NamedKey) -> EmulationError {
    EmulationError::Platform(format!("{key:?} is not available on this platform"))
}

#[cfg(target_os = "windows")]
fn lock_or_system_key(key: NamedKey) -> Option<Key> {
    match key {
        NamedKey::Insert => Some(Key::Insert),
        NamedKey::PrintScreen => Some(Key::Snapshot),
        NamedKey::Pause => Some(Key::Pause),
        NamedKey::NumLock => Some(Key::Numlock),
        NamedKey::ScrollLock => Some(Key::Scroll),
        NamedKey::Menu => Some(Key::Apps),
        _ => None,
    }
}

/// X11 keysym of the context-menu key; `enigo` has no variant for it here.
#[cfg(all(unix, not(target_os = "macos")))]
const XK_MENU: u32 = 0xff67;

#[cfg(all(unix, not(target_os = "macos")))]
fn lock_or_system_key(key: NamedKey) -> Option<Key> {
    match key {
        NamedKey::Insert => Some(Key::Insert),
        NamedKey::PrintScreen => Some(Key::Print),
        NamedKey::Pause => Some(Key::Pause),
        NamedKey::NumLock => Some(Key::Numlock),
        NamedKey::ScrollLock => Some(Key::ScrollLock),
        NamedKey::Menu => Some(Key::Other(XK_MENU)),
        _ => None,
    }
}

// Mac keyboards have none of these keys.
#[cfg(target_os = "macos")]
fn lock_or_system_key(_key: NamedKey) -> Option<Key> {
    None
}

fn function_key(n: u8) -> Result<Key, EmulationError> {
    let key = match n {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        12 => Key::F12,
        13 => Key::F13,
        14 => Key::F14,
        15 => Key::F15,
        16 => Key::F16,
        17 => Key::F17,
        18 => Key::F18,
        19 => Key::F19,
        20 => Key::F20,
        #[cfg(not(target_os = "macos"))]
        21 => Key::F21,
        #[cfg(not(target_os = "macos"))]
        22 => Key::F22,
        #[cfg(not(target_os = "macos"))]
        23 => Key::F23,
        #[cfg(not(target_os = "macos"))]
        24 => Key::F24,
        other => {
            return Err(EmulationError::Platform(format!(
                "no function key F{other}"
            )))
        }
    };
    Ok(key)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// Only the pure mapping functions are tested here; constructing `Enigo` needs
// a desktop session.
