//! The retry loop.
//!
//! A sequence moves `Idle -> Attempting` and ends in exactly one of the
//! terminal [`RetryState`]s. Attempts are strictly sequential. The only
//! suspension point is the wait between attempts, which races the delay
//! against the cancellation token.

use core::future::Future;
use core::num::NonZeroU32;
use core::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, debug_span, warn, Instrument};

use crate::retry::backoff::{Backoff, BackoffPolicy, ExponentialBackoff, MaxAttempts};
use crate::retry::failure::{classify, Failure};
use crate::retry::options::{Notify, RetryConfig, RetryOption};
use crate::sentinels::{INVALID_INPUT, RETRY_CONTEXT_CANCELED};
use crate::types::{RailResult, StructuredError};

/// Terminal state of a retry sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryState {
    /// An attempt returned success.
    Succeeded,
    /// An attempt returned [`Failure::Permanent`].
    PermanentlyFailed,
    /// The backoff ran out of time or attempts.
    Exhausted,
    /// The cancellation token fired.
    Cancelled,
}

/// Result of a retry sequence with metadata about how it ended.
#[derive(Debug)]
pub struct RetryOutcome<T = ()> {
    /// The final result.
    pub result: RailResult<T>,
    /// How the sequence ended.
    pub state: RetryState,
    /// Number of attempts started.
    pub attempts: u32,
    /// Wall-clock time from the first attempt to termination.
    pub total_elapsed: Duration,
    /// The error of the most recent failed attempt, if any.
    pub last_error: Option<StructuredError>,
}

impl<T> RetryOutcome<T> {
    /// Consumes the outcome and returns only the result.
    #[inline]
    pub fn into_result(self) -> RailResult<T> {
        self.result
    }

    /// Replaces the success value, keeping everything else.
    pub fn map<U, F>(self, f: F) -> RetryOutcome<U>
    where
        F: FnOnce(T) -> RailResult<U>,
    {
        RetryOutcome {
            result: self.result.and_then(f),
            state: self.state,
            attempts: self.attempts,
            total_elapsed: self.total_elapsed,
            last_error: self.last_error,
        }
    }
}

/// Drives a pass/fail operation against a [`Backoff`].
///
/// The retrier itself holds only configuration. Every call to
/// [`run`](Self::run) clones the backoff prototype, so one retrier can be
/// shared by many concurrent call sites.
///
/// # Example
///
/// ```rust
/// use vault_rail::retry::{Failure, Retrier, RetryConfig};
/// use vault_rail::sentinels::PEER_CONNECTION;
/// use core::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let retrier = Retrier::new(
///     RetryConfig::new()
///         .with_initial_interval(Duration::from_millis(1))
///         .with_randomization_factor(0.0),
/// )
/// .unwrap();
///
/// let mut calls = 0;
/// let result = retrier
///     .run(&CancellationToken::new(), || {
///         calls += 1;
///         let attempt = calls;
///         async move {
///             if attempt < 3 {
///                 return Err(Failure::transient(PEER_CONNECTION.clone()));
///             }
///             Ok(())
///         }
///     })
///     .await;
///
/// assert!(result.is_ok());
/// assert_eq!(calls, 3);
/// # }
/// ```
#[derive(Clone)]
pub struct Retrier<B = ExponentialBackoff> {
    backoff: B,
    notify: Option<Notify>,
}

impl Retrier<ExponentialBackoff> {
    /// Creates a time-bounded exponential retrier.
    ///
    /// # Errors
    ///
    /// Returns `invalid_input` if the backoff settings fail
    /// [`BackoffPolicy::validate`].
    pub fn new(config: RetryConfig) -> RailResult<Self> {
        Ok(Self { backoff: ExponentialBackoff::try_new(config.backoff)?, notify: config.notify })
    }

    /// Creates a retrier from default settings overridden by `options`.
    ///
    /// # Errors
    ///
    /// See [`Retrier::new`].
    pub fn from_options<I>(options: I) -> RailResult<Self>
    where
        I: IntoIterator<Item = RetryOption>,
    {
        Self::new(RetryConfig::default().apply(options))
    }

    /// Caps the sequence at `max_attempts` attempts in total.
    ///
    /// # Errors
    ///
    /// Returns `invalid_input` if `max_attempts` is zero.
    pub fn with_max_attempts(
        self,
        max_attempts: u32,
    ) -> RailResult<Retrier<MaxAttempts<ExponentialBackoff>>> {
        let max_attempts = NonZeroU32::new(max_attempts)
            .ok_or_else(|| INVALID_INPUT.wrap("max attempts must be greater than zero"))?;
        Ok(Retrier { backoff: MaxAttempts::new(self.backoff, max_attempts), notify: self.notify })
    }

    /// Returns the backoff configuration.
    #[inline]
    pub fn policy(&self) -> &BackoffPolicy {
        self.backoff.policy()
    }
}

impl<B: Backoff> Retrier<B> {
    /// Creates a retrier around any backoff implementation.
    ///
    /// `backoff` is trusted as given; build it with
    /// [`ExponentialBackoff::try_new`] when the policy comes from outside.
    #[inline]
    pub fn with_backoff(backoff: B, notify: Option<Notify>) -> Self {
        Self { backoff, notify }
    }

    /// Returns the backoff prototype cloned for every sequence.
    #[inline]
    pub fn backoff(&self) -> &B {
        &self.backoff
    }

    /// Runs `operation` until it succeeds, fails permanently, the backoff is
    /// exhausted or `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns exactly one classified [`StructuredError`]:
    /// - the operation's own error for [`Failure::Permanent`],
    /// - the backoff's exhaustion error wrapping the last failure,
    /// - `retry_context_canceled` (wrapping the last failure, if any).
    pub async fn run<F, Fut>(&self, cancel: &CancellationToken, operation: F) -> RailResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), Failure>>,
    {
        self.run_with_outcome(cancel, operation).await.result
    }

    /// Like [`run`](Self::run), but also reports attempts, timing and the terminal state.
    pub async fn run_with_outcome<F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> RetryOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), Failure>>,
    {
        let mut backoff = self.backoff.clone();
        backoff.reset();
        let start = Instant::now();
        let mut attempts = 0u32;
        let mut last_error: Option<StructuredError> = None;

        let finish = |result: RailResult<()>,
                      state: RetryState,
                      attempts: u32,
                      last_error: Option<StructuredError>| RetryOutcome {
            result,
            state,
            attempts,
            total_elapsed: start.elapsed(),
            last_error,
        };

        loop {
            if cancel.is_cancelled() {
                debug!(attempts, "retry cancelled before next attempt");
                return finish(Err(cancelled(&last_error)), RetryState::Cancelled, attempts, last_error);
            }

            attempts += 1;
            let span = debug_span!("retry_attempt", attempt = attempts);
            let error = match operation().instrument(span).await {
                Ok(()) => {
                    if attempts > 1 {
                        debug!(attempts, "operation succeeded after retrying");
                    }
                    return finish(Ok(()), RetryState::Succeeded, attempts, last_error);
                },
                Err(Failure::Permanent(e)) => {
                    let error = classify(e);
                    debug!(attempts, code = %error.code(), "operation failed permanently");
                    return finish(
                        Err(error.clone()),
                        RetryState::PermanentlyFailed,
                        attempts,
                        Some(error),
                    );
                },
                Err(Failure::Transient(e)) => classify(e),
            };

            if cancel.is_cancelled() {
                debug!(attempts, code = %error.code(), "retry cancelled during attempt");
                let last_error = Some(error);
                return finish(Err(cancelled(&last_error)), RetryState::Cancelled, attempts, last_error);
            }

            let Some(delay) = backoff.next_backoff() else {
                let exhausted = backoff.exhausted_error();
                warn!(
                    attempts,
                    code = %error.code(),
                    reason = %exhausted.code(),
                    "giving up on operation"
                );
                return finish(
                    Err(exhausted.wrap(error.clone())),
                    RetryState::Exhausted,
                    attempts,
                    Some(error),
                );
            };

            if let Some(notify) = &self.notify {
                notify(&error, delay, start.elapsed());
            }
            debug!(attempts, delay = ?delay, code = %error.code(), "attempt failed; retrying");
            last_error = Some(error);

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempts, "retry cancelled while waiting");
                    return finish(Err(cancelled(&last_error)), RetryState::Cancelled, attempts, last_error);
                }
                _ = tokio::time::sleep(delay) => {}
            }

            // A canceller woken on the same timer tick gets to run before the
            // next attempt starts.
            tokio::task::yield_now().await;
        }
    }
}

impl<B: core::fmt::Debug> core::fmt::Debug for Retrier<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Retrier")
            .field("backoff", &self.backoff)
            .field("notify", &self.notify.as_ref().map(|_| ".."))
            .finish()
    }
}

fn cancelled(last_error: &Option<StructuredError>) -> StructuredError {
    match last_error {
        Some(error) => RETRY_CONTEXT_CANCELED.wrap(error.clone()),
        None => RETRY_CONTEXT_CANCELED.clone(),
    }
}
