//! DispatchInputUseCase: translates controller events into OS input calls.
//!
//! This use case sits at the application layer and delegates to a
//! [`PlatformInputEmulator`] trait object for OS-level event injection.
//! The concrete emulators live in the infrastructure layer.
//!
//! # Dispatch table
//!
//! | Event           | Emulator call                     | Skipped when                |
//! |-----------------|-----------------------------------|-----------------------------|
//! | `mouse_move`    | `move_relative(dx, dy)`           | never                       |
//! | `mouse_click`   | `click(button)`                   | button name unknown         |
//! | `mouse_scroll`  | `scroll(clicks)`                  | never                       |
//! | `key_press`     | `press_key(key)`                  | key empty or unknown        |
//! | `keyboard_text` | `type_text(text)`                 | text empty or over the cap  |
//! | `key_combo`     | `key_combo(keys)`                 | list empty or any unknown   |
//!
//! Every event that is not skipped produces exactly one emulator call.

use remote_input_core::{
    KeyCombo, KeyPress, KeyboardText, MouseClick, MouseMove, MouseScroll, NamedKey,
    PointerButton, RemoteEvent,
};
use thiserror::Error;

use crate::domain::DispatchSettings;

/// Error type for input emulation operations.
#[derive(Debug, Error)]
pub enum EmulationError {
    /// The OS rejected or failed to deliver a synthetic event.
    #[error("platform error: {0}")]
    Platform(String),

    /// No input backend could be created (no display, missing permission).
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
}

/// Platform-agnostic input emulation trait.
///
/// Methods take `&mut self` because desktop-automation handles are stateful
/// connections (an X11 display, a CoreGraphics event source).  The emulator
/// is owned by a single worker thread, so no `Send`/`Sync` bound is needed.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformInputEmulator {
    /// Moves the cursor by a relative offset in pixels.
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<(), EmulationError>;

    /// Presses and releases one pointer button.
    fn click(&mut self, button: PointerButton) -> Result<(), EmulationError>;

    /// Scrolls vertically by whole wheel clicks; positive scrolls up.
    fn scroll(&mut self, clicks: i32) -> Result<(), EmulationError>;

    /// Presses and releases one key.
    fn press_key(&mut self, key: NamedKey) -> Result<(), EmulationError>;

    /// Types a string of text.
    fn type_text(&mut self, text: &str) -> Result<(), EmulationError>;

    /// Holds `keys` down in order, then releases them in reverse.
    fn key_combo(&mut self, keys: &[NamedKey]) -> Result<(), EmulationError>;
}

/// Why an event produced no emulator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyKey,
    EmptyText,
    /// The text is longer than `DispatchSettings::max_text_chars`.
    TextTooLong { limit: usize },
    EmptyCombo,
    UnknownKey(String),
    UnknownButton(String),
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Exactly one emulator call was made and succeeded.
    Injected,
    /// The payload resolved to a neutral value; nothing was sent to the OS.
    Skipped(SkipReason),
}

/// The Dispatch Input use case.
///
/// Receives decoded events and forwards each to the platform emulator.
pub struct DispatchInputUseCase {
    emulator: Box<dyn PlatformInputEmulator>,
    settings: DispatchSettings,
}

impl DispatchInputUseCase {
    /// Creates a new use case around the given platform emulator.
    pub fn new(emulator: Box<dyn PlatformInputEmulator>, settings: DispatchSettings) -> Self {
        Self { emulator, settings }
    }

    /// Dispatches one event.
    ///
    /// # Errors
    ///
    /// Returns [`EmulationError`] if the OS event injection fails.  Skipped
    /// events never fail.
    pub fn dispatch(&mut self, event: &RemoteEvent) -> Result<DispatchOutcome, EmulationError> {
        match event {
            RemoteEvent::MouseMove(m) => self.handle_mouse_move(m),
            RemoteEvent::MouseClick(c) => self.handle_mouse_click(c),
            RemoteEvent::MouseScroll(s) => self.handle_mouse_scroll(s),
            RemoteEvent::KeyPress(k) => self.handle_key_press(k),
            RemoteEvent::KeyboardText(t) => self.handle_keyboard_text(t),
            RemoteEvent::KeyCombo(c) => self.handle_key_combo(c),
        }
    }

    fn handle_mouse_move(&mut self, event: &MouseMove) -> Result<DispatchOutcome, EmulationError> {
        let dx = scale_to_pixels(event.dx, self.settings.pointer_scale);
        let dy = scale_to_pixels(event.dy, self.settings.pointer_scale);
        self.emulator.move_relative(dx, dy)?;
        Ok(DispatchOutcome::Injected)
    }

    fn handle_mouse_click(&mut self, event: &MouseClick) -> Result<DispatchOutcome, EmulationError> {
        let Some(button) = PointerButton::from_name(&event.button) else {
            return Ok(DispatchOutcome::Skipped(SkipReason::UnknownButton(
                event.button.clone(),
            )));
        };
        self.emulator.click(button)?;
        Ok(DispatchOutcome::Injected)
    }

    fn handle_mouse_scroll(&mut self, event: &MouseScroll) -> Result<DispatchOutcome, EmulationError> {
        // Whole wheel clicks only; fractions are truncated toward zero.
        let clicks = event.dy.trunc() as i32;
        let clicks = if self.settings.invert_scroll {
            clicks.saturating_neg()
        } else {
            clicks
        };
        self.emulator.scroll(clicks)?;
        Ok(DispatchOutcome::Injected)
    }

    fn handle_key_press(&mut self, event: &KeyPress) -> Result<DispatchOutcome, EmulationError> {
        if event.key.is_empty() {
            return Ok(DispatchOutcome::Skipped(SkipReason::EmptyKey));
        }
        let Some(key) = NamedKey::from_name(&event.key) else {
            return Ok(DispatchOutcome::Skipped(SkipReason::UnknownKey(
                event.key.clone(),
            )));
        };
        self.emulator.press_key(key)?;
        Ok(DispatchOutcome::Injected)
    }

    fn handle_keyboard_text(&mut self, event: &KeyboardText) -> Result<DispatchOutcome, EmulationError> {
        if event.text.is_empty() {
            return Ok(DispatchOutcome::Skipped(SkipReason::EmptyText));
        }
        let limit = self.settings.max_text_chars;
        if event.text.chars().nth(limit).is_some() {
            return Ok(DispatchOutcome::Skipped(SkipReason::TextTooLong { limit }));
        }
        self.emulator.type_text(&event.text)?;
        Ok(DispatchOutcome::Injected)
    }

    fn handle_key_combo(&mut self, event: &KeyCombo) -> Result<DispatchOutcome, EmulationError> {
        if event.keys.is_empty() {
            return Ok(DispatchOutcome::Skipped(SkipReason::EmptyCombo));
        }
        let mut keys = Vec::with_capacity(event.keys.len());
        for name in &event.keys {
            match NamedKey::from_name(name) {
                Some(key) => keys.push(key),
                None => return Ok(DispatchOutcome::Skipped(SkipReason::UnknownKey(name.clone()))),
            }
        }
        self.emulator.key_combo(&keys)?;
        Ok(DispatchOutcome::Injected)
    }
}

/// Scales a controller delta and truncates it to whole pixels.
///
/// Truncates toward zero, so a sub-pixel delta does not move the cursor; the
/// `as` cast saturates out-of-range values.
fn scale_to_pixels(delta: f64, scale: f64) -> i32 {
    (delta * scale).trunc() as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn use_case(mock: MockPlatformInputEmulator) -> DispatchInputUseCase {
        DispatchInputUseCase::new(Box::new(mock), DispatchSettings::default())
    }

    fn use_case_with(
        mock: MockPlatformInputEmulator,
        settings: DispatchSettings,
    ) -> DispatchInputUseCase {
        DispatchInputUseCase::new(Box::new(mock), settings)
    }

    // ── Pointer events ────────────────────────────────────────────────────────

    #[test]
    fn test_mouse_move_calls_move_relative_once() {
        // Arrange
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_move_relative()
            .with(eq(12), eq(-3))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut uc = use_case(mock);

        // Act
        let outcome = uc
            .dispatch(&RemoteEvent::MouseMove(MouseMove { dx: 12.0, dy: -3.0 }))
            .unwrap();

        // Assert
        assert_eq!(outcome, DispatchOutcome::Injected);
    }

    #[test]
    fn test_mouse_move_truncates_fractional_deltas() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_move_relative()
            .with(eq(2), eq(-2))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::MouseMove(MouseMove { dx: 2.9, dy: -2.5 }))
            .unwrap();
    }

    #[test]
    fn test_mouse_move_sub_pixel_delta_moves_nothing() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_move_relative()
            .with(eq(0), eq(-1))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::MouseMove(MouseMove { dx: 0.6, dy: -1.5 }))
            .unwrap();
    }

    #[test]
    fn test_mouse_move_zero_delta_still_calls_emulator() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_move_relative()
            .with(eq(0), eq(0))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::MouseMove(MouseMove::default()))
            .unwrap();
    }

    #[test]
    fn test_mouse_move_applies_pointer_scale() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_move_relative()
            .with(eq(20), eq(-5))
            .times(1)
            .returning(|_, _| Ok(()));
        let settings = DispatchSettings {
            pointer_scale: 2.0,
            ..DispatchSettings::default()
        };
        let mut uc = use_case_with(mock, settings);

        uc.dispatch(&RemoteEvent::MouseMove(MouseMove { dx: 10.0, dy: -2.5 }))
            .unwrap();
    }

    #[test]
    fn test_mouse_move_huge_delta_saturates() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_move_relative()
            .with(eq(i32::MAX), eq(i32::MIN))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::MouseMove(MouseMove { dx: 1e20, dy: -1e20 }))
            .unwrap();
    }

    #[test]
    fn test_mouse_click_passes_resolved_button() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_click()
            .with(eq(PointerButton::Right))
            .times(1)
            .returning(|_| Ok(()));
        let mut uc = use_case(mock);

        let outcome = uc
            .dispatch(&RemoteEvent::MouseClick(MouseClick {
                button: "right".to_string(),
            }))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Injected);
    }

    #[test]
    fn test_mouse_click_default_payload_is_left() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_click()
            .with(eq(PointerButton::Left))
            .times(1)
            .returning(|_| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::MouseClick(MouseClick::default()))
            .unwrap();
    }

    #[test]
    fn test_mouse_click_unknown_button_is_skipped() {
        // No expectations: any emulator call would panic.
        let mut uc = use_case(MockPlatformInputEmulator::new());

        let outcome = uc
            .dispatch(&RemoteEvent::MouseClick(MouseClick {
                button: "thumb".to_string(),
            }))
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::UnknownButton("thumb".to_string()))
        );
    }

    #[test]
    fn test_mouse_scroll_truncates_toward_zero() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_scroll()
            .with(eq(-2))
            .times(1)
            .returning(|_| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::MouseScroll(MouseScroll { dy: -2.9 }))
            .unwrap();
    }

    #[test]
    fn test_mouse_scroll_inverted() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_scroll()
            .with(eq(-5))
            .times(1)
            .returning(|_| Ok(()));
        let settings = DispatchSettings {
            invert_scroll: true,
            ..DispatchSettings::default()
        };
        let mut uc = use_case_with(mock, settings);

        uc.dispatch(&RemoteEvent::MouseScroll(MouseScroll { dy: 5.0 }))
            .unwrap();
    }

    #[test]
    fn test_mouse_scroll_zero_still_calls_emulator() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_scroll()
            .with(eq(0))
            .times(1)
            .returning(|_| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::MouseScroll(MouseScroll::default()))
            .unwrap();
    }

    // ── Keyboard events ───────────────────────────────────────────────────────

    #[test]
    fn test_key_press_calls_press_key_once() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_press_key()
            .with(eq(NamedKey::Backspace))
            .times(1)
            .returning(|_| Ok(()));
        let mut uc = use_case(mock);

        let outcome = uc
            .dispatch(&RemoteEvent::KeyPress(KeyPress {
                key: "backspace".to_string(),
            }))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Injected);
    }

    #[test]
    fn test_key_press_empty_key_is_skipped() {
        let mut uc = use_case(MockPlatformInputEmulator::new());

        let outcome = uc
            .dispatch(&RemoteEvent::KeyPress(KeyPress::default()))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::EmptyKey));
    }

    #[test]
    fn test_key_press_unknown_key_is_skipped() {
        let mut uc = use_case(MockPlatformInputEmulator::new());

        let outcome = uc
            .dispatch(&RemoteEvent::KeyPress(KeyPress {
                key: "hyper".to_string(),
            }))
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::UnknownKey("hyper".to_string()))
        );
    }

    #[test]
    fn test_keyboard_text_calls_type_text_once() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_type_text()
            .withf(|text| text == "hello world")
            .times(1)
            .returning(|_| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::KeyboardText(KeyboardText {
            text: "hello world".to_string(),
        }))
        .unwrap();
    }

    #[test]
    fn test_keyboard_text_empty_is_skipped() {
        let mut uc = use_case(MockPlatformInputEmulator::new());

        let outcome = uc
            .dispatch(&RemoteEvent::KeyboardText(KeyboardText::default()))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::EmptyText));
    }

    #[test]
    fn test_keyboard_text_at_the_cap_is_typed() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_type_text()
            .withf(|text| text == "héllo")
            .times(1)
            .returning(|_| Ok(()));
        let settings = DispatchSettings {
            max_text_chars: 5,
            ..DispatchSettings::default()
        };
        let mut uc = use_case_with(mock, settings);

        let outcome = uc
            .dispatch(&RemoteEvent::KeyboardText(KeyboardText {
                text: "héllo".to_string(),
            }))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Injected);
    }

    #[test]
    fn test_keyboard_text_over_the_cap_is_skipped() {
        // No expectations: typing anything would panic.
        let settings = DispatchSettings {
            max_text_chars: 5,
            ..DispatchSettings::default()
        };
        let mut uc = use_case_with(MockPlatformInputEmulator::new(), settings);

        let outcome = uc
            .dispatch(&RemoteEvent::KeyboardText(KeyboardText {
                text: "héllo!".to_string(),
            }))
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::TextTooLong { limit: 5 })
        );
    }

    #[test]
    fn test_key_combo_resolves_every_key() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_key_combo()
            .withf(|keys| keys == [NamedKey::Control, NamedKey::Shift, NamedKey::Char('t')])
            .times(1)
            .returning(|_| Ok(()));
        let mut uc = use_case(mock);

        uc.dispatch(&RemoteEvent::KeyCombo(KeyCombo {
            keys: vec!["ctrl".to_string(), "shift".to_string(), "t".to_string()],
        }))
        .unwrap();
    }

    #[test]
    fn test_key_combo_with_unknown_key_is_skipped_entirely() {
        let mut uc = use_case(MockPlatformInputEmulator::new());

        let outcome = uc
            .dispatch(&RemoteEvent::KeyCombo(KeyCombo {
                keys: vec!["ctrl".to_string(), "hyper".to_string()],
            }))
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Skipped(SkipReason::UnknownKey("hyper".to_string()))
        );
    }

    #[test]
    fn test_key_combo_empty_is_skipped() {
        let mut uc = use_case(MockPlatformInputEmulator::new());

        let outcome = uc
            .dispatch(&RemoteEvent::KeyCombo(KeyCombo::default()))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Skipped(SkipReason::EmptyCombo));
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn test_emulator_failure_is_returned() {
        let mut mock = MockPlatformInputEmulator::new();
        mock.expect_press_key()
            .times(1)
            .returning(|_| Err(EmulationError::Platform("injected failure".to_string())));
        let mut uc = use_case(mock);

        let result = uc.dispatch(&RemoteEvent::KeyPress(KeyPress {
            key: "enter".to_string(),
        }));

        assert!(matches!(result, Err(EmulationError::Platform(_))));
    }

    #[test]
    fn test_scale_to_pixels_nan_is_zero() {
        assert_eq!(scale_to_pixels(f64::NAN, 1.0), 0);
    }
}
