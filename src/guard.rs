//! Input guard and cooperative deadline
//!
//! The size ceiling is checked before any parsing. The deadline is a pure
//! comparison against an injected [`Clock`]; stages query it at checkpoints
//! and stop with [`ProcessingError::Timeout`] once the budget is spent.

use std::time::{Duration, Instant};

use crate::error::{ProcessingError, ProcessingResult, Stage};

/// Monotonic time source queried at deadline checkpoints
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Reject raw input longer than `max_input_size` bytes
///
/// # Errors
///
/// Returns [`ProcessingError::InputTooLarge`] when `input.len() > max_input_size`.
pub fn check_input_size(input: &str, max_input_size: usize) -> ProcessingResult<()> {
    let size = input.len();
    if size > max_input_size {
        return Err(ProcessingError::InputTooLarge {
            size,
            limit: max_input_size,
        });
    }
    Ok(())
}

/// Wall-clock budget for one invocation
///
/// Checks are meaningless until [`Deadline::start`] is called; an unstarted
/// deadline never reports itself exceeded.
pub struct Deadline<'a> {
    clock: &'a dyn Clock,
    limit: Duration,
    started_at: Option<Duration>,
}

impl<'a> Deadline<'a> {
    #[must_use]
    pub fn new(clock: &'a dyn Clock, limit: Duration) -> Self {
        Self {
            clock,
            limit,
            started_at: None,
        }
    }

    /// Start (or restart) the clock
    pub fn start(&mut self) {
        self.started_at = Some(self.clock.now());
    }

    /// Whether more than the budget has elapsed since [`Deadline::start`]
    #[must_use]
    pub fn exceeded(&self) -> bool {
        match self.started_at {
            Some(start) => self.clock.now().saturating_sub(start) > self.limit,
            None => false,
        }
    }

    /// Checkpoint: fail with a timeout attributed to `stage` if the budget is spent
    ///
    /// # Errors
    ///
    /// Returns [`ProcessingError::Timeout`] when [`Deadline::exceeded`] is true.
    pub fn check(&self, stage: Stage) -> ProcessingResult<()> {
        if self.exceeded() {
            tracing::warn!(%stage, limit_secs = self.limit.as_secs(), "processing deadline exceeded");
            return Err(ProcessingError::Timeout { stage });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedClock(Cell<Duration>);

    impl Clock for FixedClock {
        fn now(&self) -> Duration {
            self.0.get()
        }
    }

    #[test]
    fn test_input_at_limit_is_accepted() {
        assert!(check_input_size("abcd", 4).is_ok());
        assert_eq!(
            check_input_size("abcde", 4),
            Err(ProcessingError::InputTooLarge { size: 5, limit: 4 })
        );
    }

    #[test]
    fn test_input_size_counts_bytes() {
        // "é" is two bytes
        assert!(check_input_size("é", 1).is_err());
    }

    #[test]
    fn test_unstarted_deadline_never_exceeded() {
        let clock = FixedClock(Cell::new(Duration::from_secs(100)));
        let deadline = Deadline::new(&clock, Duration::from_secs(1));
        assert!(!deadline.exceeded());
        assert!(deadline.check(Stage::Parsing).is_ok());
    }

    #[test]
    fn test_deadline_trips_strictly_after_limit() {
        let clock = FixedClock(Cell::new(Duration::from_secs(10)));
        let mut deadline = Deadline::new(&clock, Duration::from_secs(2));
        deadline.start();

        clock.0.set(Duration::from_secs(12));
        assert!(!deadline.exceeded());

        clock.0.set(Duration::from_millis(12_001));
        assert!(deadline.exceeded());
        assert_eq!(
            deadline.check(Stage::Mutation),
            Err(ProcessingError::Timeout {
                stage: Stage::Mutation
            })
        );
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
