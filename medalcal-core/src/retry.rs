//! Exponential backoff for rate-limited writes.

use std::time::Duration;

use rand::Rng;

use crate::error::{CoreError, CoreResult};

/// Bounded exponential backoff.
///
/// Retry `n` (0-based) waits `base^n - 1` seconds, plus up to `max_jitter`
/// when that exceeds `jitter_threshold`. Retries stop once the next nominal
/// delay would push the nominal total past `max_total_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub base: f64,
    pub max_total_delay: Duration,
    pub jitter_threshold: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            base: 2.0,
            max_total_delay: Duration::from_secs(60),
            jitter_threshold: Duration::from_millis(500),
            max_jitter: Duration::from_secs(1),
        }
    }
}

/// Hard cap so a degenerate base can't loop forever.
const MAX_RETRIES_CAP: u32 = 32;

impl RetryPolicy {
    pub fn validate(&self) -> CoreResult<()> {
        if !self.base.is_finite() || self.base <= 1.0 {
            return Err(CoreError::Config(format!(
                "retry base must be greater than 1, got {}",
                self.base
            )));
        }
        Ok(())
    }

    /// Saturates at `Duration::MAX` for delays too large to represent.
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        let secs = self.base.powi(attempt.min(MAX_RETRIES_CAP) as i32) - 1.0;
        Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Nominal delay plus jitter drawn from `rng`.
    pub fn delay<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let delay = self.nominal_delay(attempt);

        if delay > self.jitter_threshold && !self.max_jitter.is_zero() {
            let jitter = rng.gen_range(0.0..self.max_jitter.as_secs_f64());
            delay.saturating_add(Duration::from_secs_f64(jitter))
        } else {
            delay
        }
    }

    /// How many retries fit in the delay budget.
    pub fn max_retries(&self) -> u32 {
        let mut total = Duration::ZERO;
        let mut retries = 0;

        while retries < MAX_RETRIES_CAP {
            match total.checked_add(self.nominal_delay(retries)) {
                Some(next) if next <= self.max_total_delay => total = next,
                _ => break,
            }
            retries += 1;
        }

        retries
    }

    /// Nominal delays of every retry the policy allows.
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.max_retries())
            .map(|n| self.nominal_delay(n))
            .collect()
    }
}
