//! Hit counting and timing state machine

use crate::clock::Clock;
use crate::input::{InputError, KeySource, Keycode};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Error terminating a hit run early
#[derive(Debug, Error)]
pub enum TimerError {
    /// The run was aborted from outside
    #[error("hit test cancelled")]
    Cancelled,
    /// The key-state source faulted mid-run
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Shared flag for aborting a run from another thread
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Completed hit run
#[derive(Debug, Clone, Copy)]
pub struct HitRun {
    /// Hits counted (equals the target on success)
    pub hits: u32,
    /// Time between the first counted press and the last
    pub elapsed: Duration,
}

/// Counts rising edges of one registered key against a monotonic clock.
///
/// All counting state lives in locals of a single run, so one timer value
/// can serve consecutive sessions without leakage between them. A rising
/// edge is "was released, now held": holding the key across many polling
/// ticks counts once, and the release flag only flips back on an observed
/// release.
pub struct HitTimer<S, C> {
    source: S,
    clock: C,
    poll_interval: Duration,
    cancel: CancelToken,
}

impl<S: KeySource, C: Clock> HitTimer<S, C> {
    pub fn new(source: S, clock: C, poll_interval: Duration) -> Self {
        Self {
            source,
            clock,
            poll_interval,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token checked on every polling tick
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Wait for the next key press and take that key as the counted one.
    ///
    /// Blocks until a poll shows exactly one held key, then waits for that
    /// key to be released, so a press that began before registration is not
    /// counted as the first hit.
    pub fn register_key(&mut self) -> Result<Keycode, TimerError> {
        let key = loop {
            self.check_cancelled()?;
            let held = self.source.held_keys()?;
            if let [key] = held[..] {
                break key;
            }
            self.pause();
        };

        // Drain the registering press before counting begins
        while self.source.is_held(key)? {
            self.check_cancelled()?;
            self.pause();
        }
        debug!("registered key {key}");
        Ok(key)
    }

    /// Count rising edges of `key` until `target` is reached.
    ///
    /// The clock starts at the first counted press, not at call time, and is
    /// read again the instant the target is reached; the loop exits the same
    /// tick. Each counted hit is reported through `on_hit`.
    pub fn run(
        &mut self,
        key: Keycode,
        target: u32,
        mut on_hit: impl FnMut(u32),
    ) -> Result<HitRun, TimerError> {
        let mut hits = 0u32;
        let mut was_held = false;
        let mut started_at = None;

        while hits < target {
            self.check_cancelled()?;
            let held = self.source.is_held(key)?;
            if held && !was_held {
                hits += 1;
                if started_at.is_none() {
                    started_at = Some(self.clock.now());
                }
                on_hit(hits);
            }
            was_held = held;
            if hits < target {
                self.pause();
            }
        }

        let elapsed = match started_at {
            Some(start) => self.clock.now().saturating_sub(start),
            None => Duration::ZERO,
        };
        Ok(HitRun { hits, elapsed })
    }

    fn check_cancelled(&self) -> Result<(), TimerError> {
        if self.cancel.is_cancelled() {
            Err(TimerError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn pause(&self) {
        if !self.poll_interval.is_zero() {
            thread::sleep(self.poll_interval);
        }
    }
}
