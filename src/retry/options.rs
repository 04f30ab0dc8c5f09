//! Functional options for configuring a retry sequence.
//!
//! Options are applied in order onto a [`RetryConfig`], so a later option
//! overrides an earlier one touching the same field. The presets rely on
//! this: [`forever`](crate::retry::forever) installs "no time ceiling" first
//! and then applies the caller's options, letting the caller re-impose one.

use core::fmt;
use core::time::Duration;
use std::sync::Arc;

use crate::retry::backoff::BackoffPolicy;
use crate::types::StructuredError;

/// Observer invoked after each failed attempt that will be retried.
///
/// Receives the triggering error, the delay about to be waited and the time
/// elapsed since the sequence started. It runs synchronously on the retry
/// loop, in attempt order, and cannot influence control flow.
pub type Notify = Arc<dyn Fn(&StructuredError, Duration, Duration) + Send + Sync>;

/// One configuration step.
#[derive(Clone)]
pub enum RetryOption {
    /// Delay before the first retry.
    InitialInterval(Duration),
    /// Ceiling on any single delay.
    MaxInterval(Duration),
    /// Ceiling on cumulative time; `Duration::ZERO` means unbounded.
    MaxElapsedTime(Duration),
    /// Growth factor per successive delay.
    Multiplier(f64),
    /// Jitter fraction; `0` is deterministic.
    RandomizationFactor(f64),
    /// Per-failure observer.
    Notify(Notify),
}

impl RetryOption {
    /// Builds a [`RetryOption::Notify`] from a closure.
    pub fn notify<F>(f: F) -> Self
    where
        F: Fn(&StructuredError, Duration, Duration) + Send + Sync + 'static,
    {
        Self::Notify(Arc::new(f))
    }
}

impl fmt::Debug for RetryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitialInterval(d) => f.debug_tuple("InitialInterval").field(d).finish(),
            Self::MaxInterval(d) => f.debug_tuple("MaxInterval").field(d).finish(),
            Self::MaxElapsedTime(d) => f.debug_tuple("MaxElapsedTime").field(d).finish(),
            Self::Multiplier(m) => f.debug_tuple("Multiplier").field(m).finish(),
            Self::RandomizationFactor(r) => f.debug_tuple("RandomizationFactor").field(r).finish(),
            Self::Notify(_) => f.write_str("Notify(..)"),
        }
    }
}

/// Backoff settings plus the optional notification hook.
///
/// # Example
///
/// ```rust
/// use vault_rail::retry::{RetryConfig, RetryOption};
/// use core::time::Duration;
///
/// let config = RetryConfig::default().apply([
///     RetryOption::MaxElapsedTime(Duration::ZERO),
///     RetryOption::MaxElapsedTime(Duration::from_secs(30)),
/// ]);
///
/// assert_eq!(config.backoff.max_elapsed_time, Some(Duration::from_secs(30)));
/// ```
#[derive(Clone, Default)]
pub struct RetryConfig {
    /// Delay sequence configuration.
    pub backoff: BackoffPolicy,
    /// Observer called for every retried failure.
    pub notify: Option<Notify>,
}

impl RetryConfig {
    /// Creates a config with default backoff and no observer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config from an explicit backoff policy.
    #[inline]
    pub fn from_policy(backoff: BackoffPolicy) -> Self {
        Self { backoff, notify: None }
    }

    /// Applies `options` in order; the last write to a field wins.
    pub fn apply<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = RetryOption>,
    {
        for option in options {
            self.apply_one(option);
        }
        self
    }

    fn apply_one(&mut self, option: RetryOption) {
        match option {
            RetryOption::InitialInterval(d) => self.backoff.initial_interval = d,
            RetryOption::MaxInterval(d) => self.backoff.max_interval = d,
            RetryOption::MaxElapsedTime(d) => {
                self.backoff.max_elapsed_time = (!d.is_zero()).then_some(d)
            },
            RetryOption::Multiplier(m) => self.backoff.multiplier = m,
            RetryOption::RandomizationFactor(r) => self.backoff.randomization_factor = r,
            RetryOption::Notify(n) => self.notify = Some(n),
        }
    }

    /// Sets the initial interval.
    #[inline]
    pub fn with_initial_interval(self, interval: Duration) -> Self {
        self.apply([RetryOption::InitialInterval(interval)])
    }

    /// Sets the maximum interval.
    #[inline]
    pub fn with_max_interval(self, interval: Duration) -> Self {
        self.apply([RetryOption::MaxInterval(interval)])
    }

    /// Sets the total time budget; `Duration::ZERO` removes it.
    #[inline]
    pub fn with_max_elapsed_time(self, budget: Duration) -> Self {
        self.apply([RetryOption::MaxElapsedTime(budget)])
    }

    /// Sets the multiplier.
    #[inline]
    pub fn with_multiplier(self, multiplier: f64) -> Self {
        self.apply([RetryOption::Multiplier(multiplier)])
    }

    /// Sets the randomization factor.
    #[inline]
    pub fn with_randomization_factor(self, factor: f64) -> Self {
        self.apply([RetryOption::RandomizationFactor(factor)])
    }

    /// Installs the notification hook.
    #[inline]
    pub fn with_notify<F>(self, f: F) -> Self
    where
        F: Fn(&StructuredError, Duration, Duration) + Send + Sync + 'static,
    {
        self.apply([RetryOption::notify(f)])
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("backoff", &self.backoff)
            .field("notify", &self.notify.as_ref().map(|_| ".."))
            .finish()
    }
}
