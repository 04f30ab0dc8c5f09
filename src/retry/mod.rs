//! Exponential-backoff retries with cooperative cancellation.
//!
//! An attempt is a closure returning a future of `Result<_, Failure>`:
//! - `Ok` ends the sequence,
//! - [`Failure::Transient`] (what `?` produces) schedules another attempt,
//! - [`Failure::Permanent`] ends the sequence with that error.
//!
//! Between attempts the engine waits for the next [`Backoff`] delay or the
//! [`CancellationToken`](tokio_util::sync::CancellationToken), whichever
//! comes first. The caller always gets back either the success value or one
//! classified [`StructuredError`](crate::StructuredError) telling why
//! retrying stopped:
//!
//! | Code | Meaning |
//! |------|---------|
//! | the operation's own code | permanent failure |
//! | `retry_max_elapsed_time_reached` | time budget spent |
//! | `retry_max_attempts_reached` | attempt budget spent |
//! | `retry_context_canceled` | caller cancelled |
//!
//! # Examples
//!
//! ```rust
//! use vault_rail::retry::{self, Failure, RetryOption};
//! use vault_rail::sentinels::{ENTITY_NOT_FOUND, RETRY_CONTEXT_CANCELED};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let cancel = CancellationToken::new();
//!
//! // A 404 is not going to fix itself.
//! let err = retry::forever(&cancel, || async {
//!     Err(Failure::permanent(ENTITY_NOT_FOUND.wrap("secret/data/app")))
//! }, [])
//! .await
//! .unwrap_err();
//! assert!(err.is(&ENTITY_NOT_FOUND));
//!
//! // Cancelled callers get a distinct code.
//! cancel.cancel();
//! let err = retry::retry(&cancel, || async { Ok(()) }).await.unwrap_err();
//! assert_eq!(err, RETRY_CONTEXT_CANCELED);
//! # }
//! ```

mod backoff;
mod engine;
mod failure;
mod options;
mod presets;
mod typed;

pub use backoff::{
    Backoff, BackoffPolicy, ExponentialBackoff, MaxAttempts, DEFAULT_INITIAL_INTERVAL,
    DEFAULT_MAX_ELAPSED_TIME, DEFAULT_MAX_INTERVAL, DEFAULT_MULTIPLIER,
    DEFAULT_RANDOMIZATION_FACTOR,
};
pub use engine::{Retrier, RetryOutcome, RetryState};
pub use failure::{classify, Failure};
pub use options::{Notify, RetryConfig, RetryOption};
pub use presets::{forever, forever_value, retry, retry_value, with_max_attempts};
pub use typed::TypedRetrier;
