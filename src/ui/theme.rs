//! Terminal colors for feedback output

use crate::score::FeedbackTier;
use crossterm::style::Color;

/// Accent for result summary lines
pub const SUMMARY: Color = Color::DarkGrey;
/// Accent for the high-score notice
pub const HIGH_SCORE: Color = Color::Green;
/// Accent for error and re-prompt messages
pub const ERROR: Color = Color::Red;

/// Presentation emphasis for each feedback tier, from the red of Low up to
/// the dark green of Excellent.
pub fn tier_color(tier: FeedbackTier) -> Color {
    match tier {
        FeedbackTier::Low => Color::Red,
        FeedbackTier::Fair => Color::Yellow,
        FeedbackTier::Good => Color::Green,
        FeedbackTier::Excellent => Color::DarkGreen,
    }
}
