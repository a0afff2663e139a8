//! Expected-speed curve and qualitative feedback

/// Hit count at which the curve is anchored to its base rate
const CURVE_ORIGIN_HITS: f64 = 20.0;
/// Expected hits per second at the curve origin
const BASE_RATE: f64 = 5.0;
/// Extra hits above the origin per additional expected hit per second
const HITS_PER_RATE_STEP: f64 = 98.0;

/// Expected hits per second for a chosen hit count.
///
/// Linear from 5.0 at 20 hits to 15.0 at 1000 hits, extended without
/// clamping outside that range; callers validate the range upstream.
pub fn expected_rate(total_hits: u32) -> f64 {
    BASE_RATE + (f64::from(total_hits) - CURVE_ORIGIN_HITS) / HITS_PER_RATE_STEP
}

/// Achieved rate relative to the expected curve.
///
/// The expected rate must be positive, which holds for every hit count the
/// session accepts.
pub fn performance_ratio(rate: f64, total_hits: u32) -> f64 {
    let expected = expected_rate(total_hits);
    debug_assert!(
        expected > 0.0,
        "expected rate not positive for {total_hits} hits"
    );
    rate / expected
}

/// Qualitative feedback bucket for a performance ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    Low,
    Fair,
    Good,
    Excellent,
}

/// One fixed message per tier, indexed by discriminant
const MESSAGES: [&str; 4] = [
    "Keep practicing to improve your speed.",
    "Good effort, you're making progress.",
    "Very good speed, keep it up!",
    "Excellent performance, outstanding speed!",
];

impl FeedbackTier {
    /// Bucket a ratio: below 0.5 Low, below 0.75 Fair, below 1.0 Good,
    /// Excellent from 1.0 up.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 0.5 {
            Self::Low
        } else if ratio < 0.75 {
            Self::Fair
        } else if ratio < 1.0 {
            Self::Good
        } else {
            Self::Excellent
        }
    }

    /// Fixed feedback message for this tier
    pub fn message(self) -> &'static str {
        MESSAGES[self as usize]
    }
}
