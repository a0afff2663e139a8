//! Boolean-state-per-key sources

use device_query::{DeviceQuery, DeviceState, Keycode};
use thiserror::Error;

/// Error raised when a key-state poll fails
#[derive(Debug, Clone, Error)]
pub enum InputError {
    /// The underlying device query could not be completed
    #[error("key state poll failed: {0}")]
    Poll(String),
}

/// Source of "is this key currently held" state.
///
/// One query corresponds to one polling tick. Any source that can report a
/// boolean held state per key works: the OS keyboard state in production, a
/// scripted replay in tests.
pub trait KeySource {
    /// Snapshot of every key currently held down
    fn held_keys(&mut self) -> Result<Vec<Keycode>, InputError>;

    /// Whether a single key is currently held down
    fn is_held(&mut self, key: Keycode) -> Result<bool, InputError> {
        Ok(self.held_keys()?.contains(&key))
    }
}

/// Key source backed by the OS-level keyboard state
pub struct DeviceKeySource {
    device_state: DeviceState,
}

impl DeviceKeySource {
    pub fn new() -> Self {
        Self {
            device_state: DeviceState::new(),
        }
    }
}

impl Default for DeviceKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for DeviceKeySource {
    fn held_keys(&mut self) -> Result<Vec<Keycode>, InputError> {
        Ok(self.device_state.get_keys())
    }
}
