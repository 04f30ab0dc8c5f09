//! Value-producing attempts on top of the pass/fail engine.

use core::future::Future;
use core::marker::PhantomData;
use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::retry::backoff::{Backoff, ExponentialBackoff};
use crate::retry::engine::{Retrier, RetryOutcome};
use crate::retry::failure::Failure;
use crate::sentinels::GENERAL_FAILURE;
use crate::types::RailResult;

/// Adapts a [`Retrier`] to operations that yield a value.
///
/// The engine only ever sees pass/fail. Each attempt's value is stored in a
/// slot owned by the call; after a successful sequence the slot holds the
/// value of the final attempt.
///
/// # Example
///
/// ```rust
/// use vault_rail::retry::{Failure, Retrier, RetryConfig, TypedRetrier};
/// use vault_rail::sentinels::NOT_READY;
/// use core::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let retrier = TypedRetrier::new(
///     Retrier::new(RetryConfig::new().with_initial_interval(Duration::from_millis(1))).unwrap(),
/// );
///
/// let mut polls = 0;
/// let token = retrier
///     .run(&CancellationToken::new(), || {
///         polls += 1;
///         let ready = polls > 1;
///         async move {
///             if !ready {
///                 return Err(Failure::transient(NOT_READY.clone()));
///             }
///             Ok(String::from("s.7Hc2"))
///         }
///     })
///     .await;
///
/// assert_eq!(token.unwrap(), "s.7Hc2");
/// # }
/// ```
pub struct TypedRetrier<T, B = ExponentialBackoff> {
    retrier: Retrier<B>,
    _value: PhantomData<fn() -> T>,
}

impl<T, B: Clone> Clone for TypedRetrier<T, B> {
    fn clone(&self) -> Self {
        Self { retrier: self.retrier.clone(), _value: PhantomData }
    }
}

impl<T, B: Backoff> TypedRetrier<T, B> {
    /// Wraps an engine.
    #[inline]
    pub fn new(retrier: Retrier<B>) -> Self {
        Self { retrier, _value: PhantomData }
    }

    /// Returns the wrapped engine.
    #[inline]
    pub fn retrier(&self) -> &Retrier<B> {
        &self.retrier
    }

    /// Runs `operation` under the engine's policy and returns its final value.
    ///
    /// # Errors
    ///
    /// Same classification as [`Retrier::run`].
    pub async fn run<F, Fut>(&self, cancel: &CancellationToken, operation: F) -> RailResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        self.run_with_outcome(cancel, operation).await.result
    }

    /// Like [`run`](Self::run), but also reports attempts, timing and the terminal state.
    pub async fn run_with_outcome<F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> RetryOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        let slot: Mutex<Option<T>> = Mutex::new(None);

        let outcome = self
            .retrier
            .run_with_outcome(cancel, || {
                let attempt = operation();
                let slot = &slot;
                async move {
                    let value = attempt.await?;
                    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value);
                    Ok(())
                }
            })
            .await;

        let value = slot.into_inner().unwrap_or_else(PoisonError::into_inner);
        outcome.map(|()| {
            value.ok_or_else(|| GENERAL_FAILURE.wrap("operation reported success without a value"))
        })
    }
}
