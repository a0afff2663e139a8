//! One test cycle: timing, scoring, leaderboard update

use crate::clock::Clock;
use crate::input::{InputError, KeySource, Keycode};
use crate::leaderboard::Leaderboard;
use crate::score::{self, FeedbackTier};
use crate::timer::{HitTimer, TimerError};
use log::warn;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Smallest accepted hit target
pub const MIN_HITS: u32 = 20;
/// Largest accepted hit target
pub const MAX_HITS: u32 = 1000;

/// Recoverable ways a test cycle ends without a result.
///
/// None of these terminate the process; the caller reports them and offers
/// a fresh session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("hit target must be between {MIN_HITS} and {MAX_HITS}, got {0}")]
    InvalidHitCount(u32),
    #[error("test cancelled")]
    Cancelled,
    #[error("completed {hits} hits in zero measurable time, result not ratable")]
    DegenerateTiming { hits: u32 },
    #[error("input polling failed: {0}")]
    Input(#[from] InputError),
}

impl From<TimerError> for SessionError {
    fn from(err: TimerError) -> Self {
        match err {
            TimerError::Cancelled => Self::Cancelled,
            TimerError::Input(err) => Self::Input(err),
        }
    }
}

/// Result bundle for one completed test
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub target_hits: u32,
    pub registered_key: Keycode,
    pub elapsed: Duration,
    /// Hits per second
    pub rate: f64,
    /// Rate relative to the expected-speed curve
    pub ratio: f64,
    pub tier: FeedbackTier,
    pub is_new_high_score: bool,
}

/// Sink for progress events raised while a test runs
pub trait SessionEvents {
    /// Waiting for the user to choose the counted key
    fn on_awaiting_key(&mut self);
    /// The counted key is registered and released; hitting may start
    fn on_key_registered(&mut self, key: Keycode);
    /// One more hit was counted
    fn on_hit(&mut self, count: u32);
}

/// Runs test cycles against one timer, leaderboard, and score store.
///
/// One controller is the single writer of its store: a session completes
/// fully, including persistence, before the next one starts.
pub struct SessionController<S, C> {
    timer: HitTimer<S, C>,
    leaderboard: Leaderboard,
    store: PathBuf,
}

impl<S: KeySource, C: Clock> SessionController<S, C> {
    pub fn new(timer: HitTimer<S, C>, leaderboard: Leaderboard, store: PathBuf) -> Self {
        Self {
            timer,
            leaderboard,
            store,
        }
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Run one full test cycle against `target` hits.
    pub fn run(
        &mut self,
        target: u32,
        events: &mut dyn SessionEvents,
    ) -> Result<SessionOutcome, SessionError> {
        if !(MIN_HITS..=MAX_HITS).contains(&target) {
            return Err(SessionError::InvalidHitCount(target));
        }

        events.on_awaiting_key();
        let key = self.timer.register_key()?;
        events.on_key_registered(key);

        let run = self.timer.run(key, target, |count| events.on_hit(count))?;
        self.score_run(target, key, run.elapsed)
    }

    /// Score a finished run and fold the rate into the leaderboard.
    ///
    /// A zero elapsed time is a failed session, not an infinite rate. A
    /// failed save keeps the in-memory board and is logged; the session
    /// still succeeds.
    fn score_run(
        &mut self,
        target: u32,
        key: Keycode,
        elapsed: Duration,
    ) -> Result<SessionOutcome, SessionError> {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return Err(SessionError::DegenerateTiming { hits: target });
        }

        let rate = f64::from(target) / secs;
        let ratio = score::performance_ratio(rate, target);
        let tier = FeedbackTier::from_ratio(ratio);

        let is_new_high_score = self.leaderboard.try_insert(rate);
        if is_new_high_score {
            if let Err(err) = self.leaderboard.save_to(&self.store) {
                warn!(
                    "failed to save high scores to {}: {err}",
                    self.store.display()
                );
            }
        }

        Ok(SessionOutcome {
            target_hits: target,
            registered_key: key,
            elapsed,
            rate,
            ratio,
            tier,
            is_new_high_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Frame, FrameClock, ScriptedKeySource};
    use std::env;
    use std::fs;
    use std::process;

    const KEY: Keycode = Keycode::Z;
    const TICK: Duration = Duration::from_millis(100);

    /// Records every event the controller raises
    #[derive(Default)]
    struct RecordingEvents {
        awaiting: u32,
        registered: Vec<Keycode>,
        hits: Vec<u32>,
    }

    impl SessionEvents for RecordingEvents {
        fn on_awaiting_key(&mut self) {
            self.awaiting += 1;
        }

        fn on_key_registered(&mut self, key: Keycode) {
            self.registered.push(key);
        }

        fn on_hit(&mut self, count: u32) {
            self.hits.push(count);
        }
    }

    fn temp_store(tag: &str) -> PathBuf {
        env::temp_dir().join(format!("tapspeed-session-{tag}-{}.txt", process::id()))
    }

    /// Registration frames followed by `taps` clean taps
    fn session_frames(taps: usize) -> Vec<Frame> {
        let mut frames = vec![Frame::down(KEY), Frame::up()];
        frames.extend(ScriptedKeySource::taps(KEY, taps));
        frames
    }

    fn controller_over(
        frames: Vec<Frame>,
        tick: Duration,
        board: Leaderboard,
        store: PathBuf,
    ) -> SessionController<ScriptedKeySource, FrameClock> {
        let clock = FrameClock::new();
        let source = ScriptedKeySource::new(frames).with_clock(clock.clone(), tick);
        let timer = HitTimer::new(source, clock, Duration::ZERO);
        SessionController::new(timer, board, store)
    }

    #[test]
    fn target_outside_range_is_rejected() {
        let store = temp_store("range");
        let mut controller = controller_over(Vec::new(), TICK, Leaderboard::new(10), store);
        let mut events = RecordingEvents::default();

        for target in [0, MIN_HITS - 1, MAX_HITS + 1] {
            let result = controller.run(target, &mut events);
            assert!(matches!(result, Err(SessionError::InvalidHitCount(t)) if t == target));
        }
        assert_eq!(events.awaiting, 0);
    }

    #[test]
    fn completed_session_produces_scored_outcome() {
        let store = temp_store("complete");
        let _ = fs::remove_file(&store);
        let mut controller =
            controller_over(session_frames(20), TICK, Leaderboard::new(10), store.clone());
        let mut events = RecordingEvents::default();

        let outcome = controller.run(20, &mut events).expect("session failed");

        // Presses land 38 ticks apart around the two registration polls
        assert_eq!(outcome.elapsed, TICK * 38);
        let expected_rate = 20.0 / outcome.elapsed.as_secs_f64();
        assert!((outcome.rate - expected_rate).abs() < 1e-9);
        assert!((outcome.ratio - expected_rate / 5.0).abs() < 1e-9);
        assert_eq!(outcome.target_hits, 20);
        assert_eq!(outcome.registered_key, KEY);
        assert!(outcome.is_new_high_score);

        assert_eq!(events.awaiting, 1);
        assert_eq!(events.registered, vec![KEY]);
        assert_eq!(events.hits.len(), 20);
        assert_eq!(events.hits.last(), Some(&20));

        // Accepted score was persisted
        let saved = fs::read_to_string(&store).expect("store not written");
        assert_eq!(saved, format!("{:.2}\n", outcome.rate));

        let _ = fs::remove_file(&store);
    }

    #[test]
    fn zero_elapsed_is_a_degenerate_session() {
        // No clock ticks attached: every poll reads the same instant
        let store = temp_store("degenerate");
        let mut controller = controller_over(
            session_frames(20),
            Duration::ZERO,
            Leaderboard::new(10),
            store,
        );
        let mut events = RecordingEvents::default();

        let result = controller.run(20, &mut events);
        assert!(matches!(
            result,
            Err(SessionError::DegenerateTiming { hits: 20 })
        ));
    }

    #[test]
    fn poll_fault_fails_the_session_and_skips_the_board() {
        let store = temp_store("fault");
        let _ = fs::remove_file(&store);
        let mut frames = vec![Frame::down(KEY), Frame::up(), Frame::down(KEY), Frame::up()];
        frames.push(Frame::Fault);
        let mut controller = controller_over(frames, TICK, Leaderboard::new(10), store.clone());
        let mut events = RecordingEvents::default();

        let result = controller.run(20, &mut events);
        assert!(matches!(result, Err(SessionError::Input(_))));
        assert!(controller.leaderboard().is_empty());
        assert!(!store.exists());
    }

    #[test]
    fn slower_rate_does_not_enter_a_full_board() {
        let store = temp_store("full-board");
        let _ = fs::remove_file(&store);
        let board = Leaderboard::from_lines(&"999.00\n".repeat(10), 10);
        let mut controller = controller_over(session_frames(20), TICK, board, store.clone());
        let mut events = RecordingEvents::default();

        let outcome = controller.run(20, &mut events).expect("session failed");
        assert!(!outcome.is_new_high_score);
        // Nothing accepted, nothing written
        assert!(!store.exists());
    }

    #[test]
    fn failed_save_keeps_the_session_result() {
        // The store path is a directory, so the save must fail
        let store = env::temp_dir();
        let mut controller =
            controller_over(session_frames(20), TICK, Leaderboard::new(10), store);
        let mut events = RecordingEvents::default();

        let outcome = controller.run(20, &mut events).expect("session failed");
        assert!(outcome.is_new_high_score);
        assert_eq!(controller.leaderboard().entries().len(), 1);
    }
}
