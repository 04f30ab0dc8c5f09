use core::time::Duration;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use vault_rail::retry::{Failure, Retrier, RetryConfig, RetryState, TypedRetrier};
use vault_rail::sentinels::{ENTITY_NOT_FOUND, PEER_CONNECTION, RETRY_MAX_ATTEMPTS_REACHED};

#[tokio::test(start_paused = true)]
async fn two_failures_then_value() {
    let delays = Arc::new(Mutex::new(Vec::new()));
    let sink = delays.clone();
    let config = RetryConfig::new()
        .with_initial_interval(Duration::from_millis(1))
        .with_max_interval(Duration::from_millis(5))
        .with_multiplier(2.0)
        .with_randomization_factor(0.0)
        .with_notify(move |_, delay, _| sink.lock().unwrap().push(delay));
    let retrier = TypedRetrier::new(Retrier::new(config).unwrap());

    let mut script = vec![Err(PEER_CONNECTION.clone()), Err(PEER_CONNECTION.clone()), Ok("v")]
        .into_iter();
    let start = Instant::now();

    let value = retrier
        .run(&CancellationToken::new(), || {
            let next = script.next().unwrap();
            async move { next.map_err(Failure::from) }
        })
        .await;

    assert_eq!(value.unwrap(), "v");
    assert_eq!(*delays.lock().unwrap(), [Duration::from_millis(1), Duration::from_millis(2)]);
    assert_eq!(start.elapsed(), Duration::from_millis(3));
}

#[tokio::test(start_paused = true)]
async fn outcome_carries_value_and_metadata() {
    let retrier = TypedRetrier::new(
        Retrier::new(RetryConfig::new().with_initial_interval(Duration::from_millis(1))).unwrap(),
    );
    let calls = AtomicU32::new(0);

    let outcome = retrier
        .run_with_outcome(&CancellationToken::new(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    return Err(Failure::transient(PEER_CONNECTION.clone()));
                }
                Ok(n * 10)
            }
        })
        .await;

    assert_eq!(outcome.state, RetryState::Succeeded);
    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.result.unwrap(), 10);
}

#[tokio::test(start_paused = true)]
async fn failure_yields_no_value() {
    let retrier: TypedRetrier<String, _> = TypedRetrier::new(
        Retrier::new(RetryConfig::new().with_initial_interval(Duration::from_millis(1)))
            .unwrap()
            .with_max_attempts(2)
            .unwrap(),
    );

    let err = retrier
        .run(&CancellationToken::new(), || async {
            Err(Failure::transient(ENTITY_NOT_FOUND.clone()))
        })
        .await
        .unwrap_err();

    assert_eq!(err, RETRY_MAX_ATTEMPTS_REACHED);
    assert!(err.is(&ENTITY_NOT_FOUND));
}

#[tokio::test(start_paused = true)]
async fn permanent_failure_keeps_its_error() {
    let retrier = TypedRetrier::new(Retrier::from_options([]).unwrap());

    let err = retrier
        .run(&CancellationToken::new(), || async {
            Err::<u64, _>(Failure::permanent(ENTITY_NOT_FOUND.wrap("transit/keys/orders")))
        })
        .await
        .unwrap_err();

    assert_eq!(err, ENTITY_NOT_FOUND);
    assert_eq!(err.to_string(), "entity not found: transit/keys/orders");
}

#[tokio::test(start_paused = true)]
async fn typed_retrier_is_cloneable() {
    let retrier: TypedRetrier<u8> = TypedRetrier::new(Retrier::from_options([]).unwrap());
    let copy = retrier.clone();

    let a = retrier.run(&CancellationToken::new(), || async { Ok(1) }).await.unwrap();
    let b = copy.run(&CancellationToken::new(), || async { Ok(2) }).await.unwrap();
    assert_eq!((a, b), (1, 2));
}
