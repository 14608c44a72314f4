//! Delay schedule between fetch attempts.
//!
//! Linear rather than exponential: attempt `n` (for `n >= 2`) waits
//! `n * step` plus up to `jitter` of random spread, so with the defaults the
//! second attempt waits 2–4 s and the third 3–5 s. The first attempt never
//! waits.

use std::time::Duration;

pub const DEFAULT_STEP: Duration = Duration::from_millis(1000);
pub const DEFAULT_JITTER: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffSchedule {
    step: Duration,
    jitter: Duration,
}

impl BackoffSchedule {
    #[must_use]
    pub const fn new(step: Duration, jitter: Duration) -> Self {
        Self { step, jitter }
    }

    /// No delay before any attempt.
    #[must_use]
    pub const fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    #[must_use]
    pub const fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Delay before `attempt` (1-based) given a jitter fraction in `[0, 1]`.
    ///
    /// Out-of-range or NaN fractions are clamped to the nearest bound.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, jitter_fraction: f64) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let fraction = if jitter_fraction.is_nan() {
            0.0
        } else {
            jitter_fraction.clamp(0.0, 1.0)
        };
        self.step
            .saturating_mul(attempt)
            .saturating_add(self.jitter.mul_f64(fraction))
    }

    /// Delay before `attempt` with a freshly drawn jitter fraction.
    #[must_use]
    pub fn sample(&self, attempt: u32) -> Duration {
        self.delay_for(attempt, rand::random::<f64>())
    }
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_STEP, DEFAULT_JITTER)
    }
}
