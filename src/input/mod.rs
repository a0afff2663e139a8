//! Key-state sources the hit timer polls

mod scripted;
mod source;

pub use device_query::Keycode;
pub use scripted::{Frame, FrameClock, ScriptedKeySource};
pub use source::{DeviceKeySource, InputError, KeySource};
