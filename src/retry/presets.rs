//! Ready-made retry policies for remote-call sites.
//!
//! | Preset | Stops on |
//! |--------|----------|
//! | [`retry`] / [`retry_value`] | success, permanent failure, cancellation, default 15 min budget |
//! | [`forever`] / [`forever_value`] | success, permanent failure, cancellation |
//! | [`with_max_attempts`] | success, permanent failure, cancellation, attempt count |

use core::future::Future;

use tokio_util::sync::CancellationToken;

use crate::retry::engine::Retrier;
use crate::retry::failure::Failure;
use crate::retry::options::{RetryConfig, RetryOption};
use crate::retry::typed::TypedRetrier;
use crate::sentinels::{INVALID_INPUT, RETRY_OPERATION_FAILED};
use crate::types::RailResult;

/// Retries with the default, time-bounded exponential policy.
///
/// # Errors
///
/// See [`Retrier::run`].
///
/// # Example
///
/// ```rust,ignore
/// use vault_rail::retry;
///
/// retry::retry(&shutdown, || async {
///     client.renew_lease(&lease_id).await?;
///     Ok(())
/// })
/// .await?;
/// ```
pub async fn retry<F, Fut>(cancel: &CancellationToken, operation: F) -> RailResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), Failure>>,
{
    Retrier::new(RetryConfig::default())?.run(cancel, operation).await
}

/// Value-producing form of [`retry`].
///
/// # Errors
///
/// See [`Retrier::run`].
pub async fn retry_value<T, F, Fut>(cancel: &CancellationToken, operation: F) -> RailResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    TypedRetrier::new(Retrier::new(RetryConfig::default())?).run(cancel, operation).await
}

/// Retries until success, a permanent failure or cancellation.
///
/// The "no time ceiling" default is applied first and `options` after it, so
/// passing [`RetryOption::MaxElapsedTime`] re-imposes a ceiling.
///
/// # Errors
///
/// Returns `invalid_input` if `options` produce an invalid policy, otherwise
/// see [`Retrier::run`].
pub async fn forever<F, Fut, I>(
    cancel: &CancellationToken,
    operation: F,
    options: I,
) -> RailResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), Failure>>,
    I: IntoIterator<Item = RetryOption>,
{
    forever_retrier(options)?.run(cancel, operation).await
}

/// Value-producing form of [`forever`].
///
/// # Errors
///
/// See [`forever`].
pub async fn forever_value<T, F, Fut, I>(
    cancel: &CancellationToken,
    operation: F,
    options: I,
) -> RailResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
    I: IntoIterator<Item = RetryOption>,
{
    TypedRetrier::new(forever_retrier(options)?).run(cancel, operation).await
}

fn forever_retrier<I>(options: I) -> RailResult<Retrier>
where
    I: IntoIterator<Item = RetryOption>,
{
    let unbounded = core::iter::once(RetryOption::MaxElapsedTime(core::time::Duration::ZERO));
    Retrier::from_options(unbounded.chain(options))
}

/// Retries an operation at most `max_attempts` times.
///
/// The operation reports `Ok(true)` when done. `Ok(false)` means "not yet"
/// and is retried like a transient failure. There is no time ceiling unless
/// `options` set one; the count, a permanent failure or cancellation end the
/// sequence. `options` are applied after the "no time ceiling" default, the
/// same way [`forever`] applies them.
///
/// # Errors
///
/// - `invalid_input` if `max_attempts` is zero or `options` produce an
///   invalid policy; the operation is not called.
/// - `retry_max_attempts_reached` wrapping the last failure once the count is spent.
/// - otherwise see [`Retrier::run`].
///
/// # Example
///
/// ```rust
/// use vault_rail::retry::with_max_attempts;
/// use vault_rail::sentinels::INVALID_INPUT;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let err = with_max_attempts(&CancellationToken::new(), 0, || async { Ok(true) }, [])
///     .await
///     .unwrap_err();
/// assert_eq!(err, INVALID_INPUT);
/// # }
/// ```
pub async fn with_max_attempts<F, Fut, I>(
    cancel: &CancellationToken,
    max_attempts: u32,
    mut operation: F,
    options: I,
) -> RailResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, Failure>>,
    I: IntoIterator<Item = RetryOption>,
{
    if max_attempts == 0 {
        return Err(INVALID_INPUT.wrap("max attempts must be greater than zero"));
    }

    let retrier = forever_retrier(options)?.with_max_attempts(max_attempts)?;

    retrier
        .run(cancel, || {
            let attempt = operation();
            async move {
                if attempt.await? {
                    Ok(())
                } else {
                    Err(Failure::transient(
                        RETRY_OPERATION_FAILED.with_message("operation has not succeeded yet"),
                    ))
                }
            }
        })
        .await
}
