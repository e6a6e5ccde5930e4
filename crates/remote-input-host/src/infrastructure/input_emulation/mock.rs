//! Recording input emulator.
//!
//! The real emulator moves the actual cursor and presses real keys, which
//! cannot be observed from test code and needs a desktop session.  The
//! `RecordingEmulator` replaces every OS call with an entry in a shared list so
//! tests can assert exactly what was emitted and in what order.
//!
//! Clones share the same list: hand one clone to the input worker and keep
//! another in the test to inspect.
//!
//! # Usage in tests
//!
//! ```ignore
//! let recorder = RecordingEmulator::new();
//! let worker = InputWorker::spawn(
//!     {
//!         let recorder = recorder.clone();
//!         move || Ok(Box::new(recorder) as Box<dyn PlatformInputEmulator>)
//!     },
//!     DispatchSettings::default(),
//! )?;
//!
//! worker.dispatch(event).await?;
//! assert_eq!(recorder.actions(), vec![EmulatedAction::Click(PointerButton::Left)]);
//! ```
//!
//! # `failing` emulator
//!
//! [`RecordingEmulator::failing`] makes every call return
//! `EmulationError::Platform` so error-handling paths can be exercised.

use std::sync::{Arc, Mutex, PoisonError};

use remote_input_core::{NamedKey, PointerButton};
use tracing::debug;

use crate::application::{EmulationError, PlatformInputEmulator};

/// One recorded emulator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmulatedAction {
    MoveRelative { dx: i32, dy: i32 },
    Click(PointerButton),
    Scroll(i32),
    PressKey(NamedKey),
    TypeText(String),
    KeyCombo(Vec<NamedKey>),
}

/// An emulator that records calls without performing OS API calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmulator {
    actions: Arc<Mutex<Vec<EmulatedAction>>>,
    should_fail: bool,
}

impl RecordingEmulator {
    /// Creates a recorder with an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder whose every call fails without recording.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Returns a snapshot of everything recorded so far.
    pub fn actions(&self) -> Vec<EmulatedAction> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EmulatedAction>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.actions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, action: EmulatedAction) -> Result<(), EmulationError> {
        if self.should_fail {
            return Err(EmulationError::Platform("recording emulator set to fail".into()));
        }
        match &action {
            EmulatedAction::TypeText(text) => {
                debug!(chars = text.chars().count(), "recorded text input");
            }
            other => debug!(action = ?other, "recorded input"),
        }
        self.lock().push(action);
        Ok(())
    }
}

impl PlatformInputEmulator for RecordingEmulator {
    fn move_relative(&mut self, dx: i32, dy: i32) -> Result<(), EmulationError> {
        self.record(EmulatedAction::MoveRelative { dx, dy })
    }

    fn click(&mut self, button: PointerButton) -> Result<(), EmulationError> {
        self.record(EmulatedAction::Click(button))
    }

    fn scroll(&mut self, clicks: i32) -> Result<(), EmulationError> {
        self.record(EmulatedAction::Scroll(clicks))
    }

    fn press_key(&mut self, key: NamedKey) -> Result<(), EmulationError> {
        self.record(EmulatedAction::PressKey(key))
    }

    fn type_text(&mut self, text: &str) -> Result<(), EmulationError> {
        self.record(EmulatedAction::TypeText(text.to_string()))
    }

    fn key_combo(&mut self, keys: &[NamedKey]) -> Result<(), EmulationError> {
        self.record(EmulatedAction::KeyCombo(keys.to_vec()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
