use core::time::Duration;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use vault_rail::retry::{Failure, Retrier, RetryConfig, RetryState};
use vault_rail::sentinels::{
    NOT_READY, PEER_CONNECTION, READ_FAILURE, RETRY_CONTEXT_CANCELED, RETRY_MAX_ELAPSED_TIME_REACHED,
    RETRY_OPERATION_FAILED, UNAUTHORIZED,
};

type Notifications = Arc<Mutex<Vec<(String, Duration, Duration)>>>;

fn fast() -> RetryConfig {
    RetryConfig::new()
        .with_initial_interval(Duration::from_millis(1))
        .with_max_interval(Duration::from_millis(5))
        .with_multiplier(2.0)
        .with_randomization_factor(0.0)
}

fn recording(config: RetryConfig) -> (RetryConfig, Notifications) {
    let seen: Notifications = Arc::default();
    let sink = seen.clone();
    let config = config.with_notify(move |err, delay, elapsed| {
        sink.lock().unwrap().push((err.code().to_string(), delay, elapsed));
    });
    (config, seen)
}

#[tokio::test(start_paused = true)]
async fn immediate_success_never_notifies() {
    let (config, seen) = recording(fast());
    let retrier = Retrier::new(config).unwrap();

    let outcome = retrier.run_with_outcome(&CancellationToken::new(), || async { Ok(()) }).await;

    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.state, RetryState::Succeeded);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn eventual_success_notifies_each_failure() {
    let (config, seen) = recording(fast().with_multiplier(1.5).with_max_interval(Duration::from_secs(1)));
    let retrier = Retrier::new(config).unwrap();
    let calls = AtomicU32::new(0);

    let outcome = retrier
        .run_with_outcome(&CancellationToken::new(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 5 {
                    return Err(Failure::transient(NOT_READY.clone()));
                }
                Ok(())
            }
        })
        .await;

    assert!(outcome.result.is_ok());
    assert_eq!(outcome.attempts, 5);
    assert_eq!(calls.load(Ordering::SeqCst), 5);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|(code, _, _)| code == "not_ready"));
    let delays: Vec<_> = seen.iter().map(|(_, delay, _)| *delay).collect();
    assert!(delays.windows(2).all(|w| w[0] < w[1]), "{delays:?} not strictly increasing");
}

#[tokio::test(start_paused = true)]
async fn notify_reports_running_elapsed_time() {
    let (config, seen) = recording(fast());
    let retrier = Retrier::new(config).unwrap();
    let calls = AtomicU32::new(0);

    retrier
        .run(&CancellationToken::new(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 3 {
                    return Err(Failure::transient(READ_FAILURE.clone()));
                }
                Ok(())
            }
        })
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    let elapsed: Vec<_> = seen.iter().map(|(_, _, elapsed)| *elapsed).collect();
    assert_eq!(elapsed, [Duration::ZERO, Duration::from_millis(1), Duration::from_millis(3)]);
}

#[tokio::test(start_paused = true)]
async fn exhaustion_by_time_stays_near_budget() {
    let budget = Duration::from_millis(10);
    let retrier = Retrier::new(fast().with_max_elapsed_time(budget)).unwrap();
    let start = Instant::now();

    let outcome = retrier
        .run_with_outcome(&CancellationToken::new(), || async {
            Err(Failure::transient(PEER_CONNECTION.clone()))
        })
        .await;

    assert_eq!(outcome.state, RetryState::Exhausted);
    assert!(start.elapsed() <= budget);
    let err = outcome.result.unwrap_err();
    assert_eq!(err, RETRY_MAX_ELAPSED_TIME_REACHED);
    assert!(err.is(&PEER_CONNECTION));
    assert_eq!(outcome.last_error.unwrap(), PEER_CONNECTION);
}

#[tokio::test(start_paused = true)]
async fn permanent_failure_returns_operation_error() {
    let (config, seen) = recording(fast());
    let retrier = Retrier::new(config).unwrap();

    let err = retrier
        .run(&CancellationToken::new(), || async {
            Err(Failure::permanent(UNAUTHORIZED.with_message("token revoked")))
        })
        .await
        .unwrap_err();

    assert_eq!(err, UNAUTHORIZED);
    assert_eq!(err.message(), "token revoked");
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn foreign_errors_are_classified() {
    let retrier = Retrier::new(fast()).unwrap();

    let err = retrier
        .run(&CancellationToken::new(), || async {
            Err(Failure::permanent(std::io::Error::other("disk quota exceeded")))
        })
        .await
        .unwrap_err();

    assert_eq!(err, RETRY_OPERATION_FAILED);
    assert_eq!(err.root_cause().to_string(), "disk quota exceeded");
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_wait() {
    let cancel = CancellationToken::new();
    let retrier = Retrier::new(
        fast()
            .with_initial_interval(Duration::from_millis(8))
            .with_max_interval(Duration::from_millis(8))
            .with_max_elapsed_time(Duration::from_millis(10)),
    )
    .unwrap();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(5)).await;
        trigger.cancel();
    });

    let outcome = retrier
        .run_with_outcome(&cancel, || async { Err(Failure::transient(PEER_CONNECTION.clone())) })
        .await;

    assert_eq!(outcome.state, RetryState::Cancelled);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.total_elapsed, Duration::from_millis(5));
    let err = outcome.result.unwrap_err();
    assert_eq!(err, RETRY_CONTEXT_CANCELED);
    assert!(err.is(&PEER_CONNECTION));
}

#[tokio::test(start_paused = true)]
async fn cancellation_at_end_of_wait_beats_exhaustion() {
    let cancel = CancellationToken::new();
    let retrier = Retrier::new(
        fast()
            .with_initial_interval(Duration::from_millis(8))
            .with_max_interval(Duration::from_millis(8))
            .with_max_elapsed_time(Duration::from_millis(10)),
    )
    .unwrap();

    // fires on the same tick the first wait ends
    let trigger = cancel.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(8)).await;
        trigger.cancel();
    });

    let outcome = retrier
        .run_with_outcome(&cancel, || async { Err(Failure::transient(PEER_CONNECTION.clone())) })
        .await;

    assert_eq!(outcome.state, RetryState::Cancelled);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.total_elapsed, Duration::from_millis(8));
    assert_eq!(outcome.result.unwrap_err(), RETRY_CONTEXT_CANCELED);
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_attempt_wins_over_retry() {
    let cancel = CancellationToken::new();
    let retrier = Retrier::new(fast()).unwrap();

    let outcome = retrier
        .run_with_outcome(&cancel, || {
            cancel.cancel();
            async { Err(Failure::transient(READ_FAILURE.clone())) }
        })
        .await;

    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.state, RetryState::Cancelled);
    assert_eq!(outcome.result.unwrap_err(), RETRY_CONTEXT_CANCELED);
}

#[tokio::test(start_paused = true)]
async fn question_mark_retries_by_default() {
    let retrier = Retrier::new(fast()).unwrap();
    let calls = AtomicU32::new(0);

    let fetch = |attempt: u32| -> Result<(), vault_rail::StructuredError> {
        if attempt < 2 {
            Err(PEER_CONNECTION.wrap("connection refused"))
        } else {
            Ok(())
        }
    };

    let outcome = retrier
        .run_with_outcome(&CancellationToken::new(), || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                fetch(attempt)?;
                Ok::<_, Failure>(())
            }
        })
        .await;

    assert!(outcome.result.is_ok());
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.last_error.unwrap(), PEER_CONNECTION);
}

#[tokio::test(start_paused = true)]
async fn retrier_is_reusable_across_sequences() {
    let retrier = Retrier::new(fast().with_max_elapsed_time(Duration::from_millis(10))).unwrap();

    for _ in 0..2 {
        let outcome = retrier
            .run_with_outcome(&CancellationToken::new(), || async {
                Err(Failure::transient(PEER_CONNECTION.clone()))
            })
            .await;
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.total_elapsed, Duration::from_millis(7));
    }
}
