//! Backoff policies: how long to wait before the next attempt, and when to stop.

use core::num::NonZeroU32;
use core::time::Duration;

use tokio::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sentinels::{INVALID_INPUT, RETRY_MAX_ATTEMPTS_REACHED, RETRY_MAX_ELAPSED_TIME_REACHED};
use crate::types::{RailResult, StructuredError};

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
/// Default jitter fraction.
pub const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;
/// Default growth factor between successive delays.
pub const DEFAULT_MULTIPLIER: f64 = 1.5;
/// Default ceiling on a single delay.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);
/// Default ceiling on the total time spent retrying.
pub const DEFAULT_MAX_ELAPSED_TIME: Duration = Duration::from_secs(15 * 60);

/// Source of inter-attempt delays for one retry sequence.
///
/// Implementations are owned by exactly one sequence; the engine clones the
/// configured prototype and calls [`reset`](Self::reset) before the first
/// attempt, so no locking is involved.
pub trait Backoff: Clone + Send {
    /// Returns the delay before the next attempt, or `None` to stop retrying.
    fn next_backoff(&mut self) -> Option<Duration>;

    /// Restores the initial state and restarts the elapsed-time clock.
    fn reset(&mut self);

    /// The error surfaced once [`next_backoff`](Self::next_backoff) has returned `None`.
    fn exhausted_error(&self) -> StructuredError {
        RETRY_MAX_ELAPSED_TIME_REACHED.clone()
    }
}

/// Configuration of an exponential delay sequence.
///
/// Each delay is the previous one times [`multiplier`](Self::multiplier),
/// capped at [`max_interval`](Self::max_interval), then spread by
/// `± randomization_factor` around that value. A `None`
/// [`max_elapsed_time`](Self::max_elapsed_time) never stops on time.
///
/// # Example
///
/// ```rust
/// use vault_rail::retry::BackoffPolicy;
/// use core::time::Duration;
///
/// let policy = BackoffPolicy::new()
///     .with_initial_interval(Duration::from_millis(100))
///     .with_max_interval(Duration::from_secs(10))
///     .with_multiplier(2.0)
///     .with_randomization_factor(0.0);
///
/// // Delays: 100ms, 200ms, 400ms, 800ms, ... capped at 10s
/// assert!(policy.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Ceiling on any single delay.
    pub max_interval: Duration,
    /// Ceiling on the cumulative time since the sequence started.
    pub max_elapsed_time: Option<Duration>,
    /// Growth factor applied to each successive delay.
    pub multiplier: f64,
    /// Jitter fraction in `[0, 1]`; `0` makes delays deterministic.
    pub randomization_factor: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            max_elapsed_time: Some(DEFAULT_MAX_ELAPSED_TIME),
            multiplier: DEFAULT_MULTIPLIER,
            randomization_factor: DEFAULT_RANDOMIZATION_FACTOR,
        }
    }
}

impl BackoffPolicy {
    /// Creates a policy with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial interval.
    #[inline]
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    /// Sets the maximum interval.
    #[inline]
    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    /// Sets the total time budget. `Duration::ZERO` removes the ceiling.
    #[inline]
    pub fn with_max_elapsed_time(mut self, budget: Duration) -> Self {
        self.max_elapsed_time = (!budget.is_zero()).then_some(budget);
        self
    }

    /// Sets the multiplier.
    #[inline]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the randomization factor.
    #[inline]
    pub fn with_randomization_factor(mut self, factor: f64) -> Self {
        self.randomization_factor = factor;
        self
    }

    /// Checks that the values describe a usable, non-decreasing sequence.
    ///
    /// # Errors
    ///
    /// Returns [`INVALID_INPUT`] describing the first offending field.
    pub fn validate(&self) -> RailResult<()> {
        if self.initial_interval.is_zero() {
            return Err(INVALID_INPUT.wrap("initial interval must be greater than zero"));
        }
        if self.max_interval < self.initial_interval {
            return Err(INVALID_INPUT.wrap("max interval must not be below the initial interval"));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(INVALID_INPUT.wrap(format!(
                "multiplier must be a finite value >= 1, got {}",
                self.multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            return Err(INVALID_INPUT.wrap(format!(
                "randomization factor must be within [0, 1], got {}",
                self.randomization_factor
            )));
        }
        Ok(())
    }
}

/// Exponential backoff bounded by a total time budget.
///
/// # Example
///
/// ```rust
/// use vault_rail::retry::{Backoff, BackoffPolicy, ExponentialBackoff};
/// use core::time::Duration;
///
/// let mut backoff = ExponentialBackoff::new(
///     BackoffPolicy::new()
///         .with_initial_interval(Duration::from_millis(1))
///         .with_max_interval(Duration::from_millis(5))
///         .with_multiplier(2.0)
///         .with_randomization_factor(0.0),
/// );
///
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(1)));
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(2)));
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(4)));
/// assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(5)));
/// ```
#[derive(Clone, Debug)]
pub struct ExponentialBackoff {
    policy: BackoffPolicy,
    current_interval: Duration,
    start: Instant,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(BackoffPolicy::default())
    }
}

impl ExponentialBackoff {
    /// Creates a backoff whose clock starts now.
    ///
    /// The policy is used as given. A policy that fails
    /// [`BackoffPolicy::validate`] (for instance a multiplier below 1) yields
    /// shrinking delays; use [`try_new`](Self::try_new) for untrusted input.
    pub fn new(policy: BackoffPolicy) -> Self {
        let current_interval = policy.initial_interval;
        Self { policy, current_interval, start: Instant::now() }
    }

    /// Creates a backoff after checking the policy.
    ///
    /// # Errors
    ///
    /// Returns [`INVALID_INPUT`] if the policy fails [`BackoffPolicy::validate`].
    pub fn try_new(policy: BackoffPolicy) -> RailResult<Self> {
        policy.validate()?;
        Ok(Self::new(policy))
    }

    /// Returns the configuration.
    #[inline]
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Returns the un-jittered interval the next call will start from.
    #[inline]
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    /// Time since the last reset.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn increment_current_interval(&mut self) {
        let max = self.policy.max_interval.as_secs_f64();
        if self.current_interval.as_secs_f64() >= max / self.policy.multiplier {
            self.current_interval = self.policy.max_interval;
        } else {
            self.current_interval = scale(self.current_interval, self.policy.multiplier);
        }
    }
}

impl Backoff for ExponentialBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        let elapsed = self.elapsed();
        let next = randomize(self.current_interval, self.policy.randomization_factor);
        self.increment_current_interval();

        match self.policy.max_elapsed_time {
            Some(budget) if elapsed.saturating_add(next) > budget => None,
            _ => Some(next),
        }
    }

    fn reset(&mut self) {
        self.current_interval = self.policy.initial_interval;
        self.start = Instant::now();
    }
}

/// Picks a value uniformly in `[interval - f * interval, interval + f * interval]`.
fn randomize(interval: Duration, factor: f64) -> Duration {
    if factor <= 0.0 {
        return interval;
    }
    let base = interval.as_nanos() as f64;
    let delta = factor * base;
    let low = base - delta;
    let high = base + delta;
    Duration::from_nanos((low + rand::random::<f64>() * (high - low)).round() as u64)
}

fn scale(interval: Duration, multiplier: f64) -> Duration {
    Duration::from_nanos((interval.as_nanos() as f64 * multiplier).round() as u64)
}

/// Caps any backoff to a fixed number of attempts.
///
/// `MaxAttempts::new(inner, 3)` allows the first attempt plus two retries.
/// Once the count is spent it reports its own exhaustion error
/// ([`RETRY_MAX_ATTEMPTS_REACHED`] unless replaced).
#[derive(Clone, Debug)]
pub struct MaxAttempts<B> {
    inner: B,
    max_attempts: NonZeroU32,
    failures: u32,
    exhausted: StructuredError,
}

impl<B: Backoff> MaxAttempts<B> {
    /// Wraps `inner`, allowing at most `max_attempts` attempts in total.
    pub fn new(inner: B, max_attempts: NonZeroU32) -> Self {
        Self { inner, max_attempts, failures: 0, exhausted: RETRY_MAX_ATTEMPTS_REACHED.clone() }
    }

    /// Replaces the error reported when the attempt count runs out.
    #[inline]
    pub fn with_exhausted_error(mut self, error: StructuredError) -> Self {
        self.exhausted = error;
        self
    }

    /// Maximum number of attempts.
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }

    fn count_spent(&self) -> bool {
        self.failures >= self.max_attempts.get()
    }
}

impl<B: Backoff> Backoff for MaxAttempts<B> {
    fn next_backoff(&mut self) -> Option<Duration> {
        self.failures = self.failures.saturating_add(1);
        if self.count_spent() {
            return None;
        }
        self.inner.next_backoff()
    }

    fn reset(&mut self) {
        self.failures = 0;
        self.inner.reset();
    }

    fn exhausted_error(&self) -> StructuredError {
        if self.count_spent() {
            self.exhausted.clone()
        } else {
            self.inner.exhausted_error()
        }
    }
}
