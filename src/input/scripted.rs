//! Deterministic key source for driving the hit timer without hardware

use super::{InputError, KeySource, Keycode};
use crate::clock::Clock;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One polling tick's worth of simulated key state
#[derive(Debug, Clone)]
pub enum Frame {
    /// Keys held down during this tick
    Held(Vec<Keycode>),
    /// The poll itself fails
    Fault,
}

impl Frame {
    /// Frame with no keys held
    pub fn up() -> Self {
        Frame::Held(Vec::new())
    }

    /// Frame with a single key held
    pub fn down(key: Keycode) -> Self {
        Frame::Held(vec![key])
    }
}

/// Key source that replays a scripted sequence of per-tick snapshots.
///
/// Each `held_keys`/`is_held` query consumes one frame; once the script is
/// exhausted the last snapshot repeats. An attached [`FrameClock`] advances
/// by one tick per query, which makes elapsed time exact in tests.
pub struct ScriptedKeySource {
    frames: VecDeque<Frame>,
    current: Frame,
    clock: Option<FrameClock>,
    tick: Duration,
}

impl ScriptedKeySource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current: Frame::up(),
            clock: None,
            tick: Duration::ZERO,
        }
    }

    /// Frames for `n` clean taps of `key`: down, up, down, up, ...
    pub fn taps(key: Keycode, n: usize) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(n * 2);
        for _ in 0..n {
            frames.push(Frame::down(key));
            frames.push(Frame::up());
        }
        frames
    }

    /// Attach a clock that advances by `tick` on every poll
    pub fn with_clock(mut self, clock: FrameClock, tick: Duration) -> Self {
        self.clock = Some(clock);
        self.tick = tick;
        self
    }

    /// Frames not yet consumed by polling
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    fn advance(&mut self) -> Frame {
        if let Some(frame) = self.frames.pop_front() {
            self.current = frame;
        }
        if let Some(clock) = &self.clock {
            clock.advance(self.tick);
        }
        self.current.clone()
    }
}

impl KeySource for ScriptedKeySource {
    fn held_keys(&mut self) -> Result<Vec<Keycode>, InputError> {
        match self.advance() {
            Frame::Held(keys) => Ok(keys),
            Frame::Fault => Err(InputError::Poll("scripted poll fault".to_string())),
        }
    }
}

/// Shared counter implementing [`Clock`] for simulated runs.
///
/// Clones share the same counter, so a [`ScriptedKeySource`] can advance the
/// clock the timer reads from.
#[derive(Debug, Clone, Default)]
pub struct FrameClock(Arc<AtomicU64>);

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the shared counter
    pub fn advance(&self, by: Duration) {
        self.0.fetch_add(by.as_micros() as u64, Ordering::SeqCst);
    }

    /// Current reading of the shared counter
    pub fn read(&self) -> Duration {
        Duration::from_micros(self.0.load(Ordering::SeqCst))
    }
}

impl Clock for FrameClock {
    fn now(&mut self) -> Duration {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: Keycode = Keycode::Z;

    #[test]
    fn frames_consumed_in_order() {
        let mut source = ScriptedKeySource::new([Frame::down(KEY), Frame::up()]);
        assert_eq!(source.held_keys().unwrap(), vec![KEY]);
        assert_eq!(source.held_keys().unwrap(), Vec::<Keycode>::new());
    }

    #[test]
    fn exhausted_script_repeats_last_frame() {
        let mut source = ScriptedKeySource::new([Frame::down(KEY)]);
        assert!(source.is_held(KEY).unwrap());
        assert!(source.is_held(KEY).unwrap());
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn fault_frame_raises_poll_error() {
        let mut source = ScriptedKeySource::new([Frame::Fault]);
        assert!(source.held_keys().is_err());
    }

    #[test]
    fn attached_clock_advances_one_tick_per_poll() {
        let clock = FrameClock::new();
        let tick = Duration::from_millis(10);
        let mut source =
            ScriptedKeySource::new(ScriptedKeySource::taps(KEY, 2)).with_clock(clock.clone(), tick);

        for _ in 0..3 {
            let _ = source.held_keys().unwrap();
        }
        assert_eq!(clock.read(), tick * 3);
    }

    #[test]
    fn taps_alternate_down_and_up() {
        let frames = ScriptedKeySource::taps(KEY, 2);
        assert_eq!(frames.len(), 4);
        assert!(matches!(&frames[0], Frame::Held(keys) if keys == &vec![KEY]));
        assert!(matches!(&frames[1], Frame::Held(keys) if keys.is_empty()));
    }
}
