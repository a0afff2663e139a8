//! Terminal presentation: prompts, colors, result rendering

pub mod console;
pub mod theme;

pub use console::{ConsolePresenter, RawModeGuard};
