//! Tower integration for vault-rail.
//!
//! This module provides a Tower `Layer` and `Service` that drive every call
//! of the wrapped service through a [`Retrier`].
//!
//! # Feature Flag
//!
//! Requires the `tower` feature:
//!
//! ```toml
//! [dependencies]
//! vault-rail = { version = "0.1", features = ["tower"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use vault_rail::retry::Retrier;
//! use vault_rail::tower::RetryLayer;
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .layer(RetryLayer::new(Retrier::from_options([])?, shutdown.clone()))
//!     .service(kv_client);
//! ```

use core::task::{Context, Poll};

use futures_core::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tower::{Layer, Service, ServiceExt};

use crate::retry::{Backoff, ExponentialBackoff, Failure, Retrier, TypedRetrier};
use crate::types::{BoxError, StructuredError};

/// A Tower [`Layer`] that retries failed calls of the wrapped service.
///
/// Every attempt clones the inner service and the request, waits for the
/// clone to become ready and calls it. Inner errors are transient; use
/// [`RetryService::with_classifier`] to mark some of them permanent.
#[derive(Clone, Debug)]
pub struct RetryLayer<B = ExponentialBackoff> {
    retrier: Retrier<B>,
    cancel: CancellationToken,
}

impl<B> RetryLayer<B> {
    /// Creates a layer sharing `cancel` across every call it wraps.
    #[inline]
    pub const fn new(retrier: Retrier<B>, cancel: CancellationToken) -> Self {
        Self { retrier, cancel }
    }

    /// Returns the retry engine.
    #[inline]
    pub const fn retrier(&self) -> &Retrier<B> {
        &self.retrier
    }
}

impl<S, B: Clone> Layer<S> for RetryLayer<B> {
    type Service = RetryService<S, B>;

    #[inline]
    fn layer(&self, inner: S) -> Self::Service {
        RetryService {
            inner,
            retrier: self.retrier.clone(),
            cancel: self.cancel.clone(),
            classifier: None,
        }
    }
}

/// Decides whether an inner service error may be retried.
pub type Classifier = fn(BoxError) -> Failure;

/// A Tower [`Service`] that retries the inner service.
///
/// This is created by [`RetryLayer`]. Responses come back unchanged;
/// failures come back as one classified [`StructuredError`].
pub struct RetryService<S, B = ExponentialBackoff> {
    inner: S,
    retrier: Retrier<B>,
    cancel: CancellationToken,
    classifier: Option<Classifier>,
}

impl<S: Clone, B: Clone> Clone for RetryService<S, B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            retrier: self.retrier.clone(),
            cancel: self.cancel.clone(),
            classifier: self.classifier,
        }
    }
}

impl<S, B> RetryService<S, B> {
    /// Replaces the default "everything is transient" classification.
    #[inline]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Returns a reference to the inner service.
    #[inline]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Consumes the wrapper and returns the inner service.
    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B, Request> Service<Request> for RetryService<S, B>
where
    S: Service<Request> + Clone + Send + 'static,
    S::Response: Send + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
    B: Backoff + Sync + 'static,
    Request: Clone + Send + 'static,
{
    type Response = S::Response;
    type Error = StructuredError;
    type Future = BoxFuture<'static, Result<S::Response, StructuredError>>;

    #[inline]
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // Readiness is awaited per attempt on a clone of the inner service.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let retrier = TypedRetrier::new(self.retrier.clone());
        let cancel = self.cancel.clone();
        let inner = self.inner.clone();
        let classify = self.classifier.unwrap_or(Failure::Transient);

        Box::pin(async move {
            retrier
                .run(&cancel, move || {
                    let service = inner.clone();
                    let request = request.clone();
                    async move {
                        service.oneshot(request).await.map_err(|e| classify(e.into()))
                    }
                })
                .await
        })
    }
}
