//! when we have an operation that may fail, try it again at a fixed interval until
//!     - it succeeds
//!     - it marks its failure as terminal
//!     - the deadline passes
//!
//! the attempts run on their own tokio task, the caller only waits on a race between that task
//! and the deadline. when the deadline wins the attempt in flight is not killed, it runs to
//! completion in the background and its result is dropped. the loop notices that nobody is
//! waiting anymore and does not start another attempt.

use crate::config::RetryConfig;
use crate::log_sink::{attempt_failed_message, LogSink};
use crate::outcome::RetryOutcome;
use crate::retryable::{Failure, Terminal};
use std::{fmt, future::Future, panic, sync::Arc, time::Duration};
use tokio::task::JoinError;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// `try_until_with` using the default log sink
///
/// # Panics
/// outside of a tokio runtime, the attempts are started with `tokio::spawn`
pub async fn try_until<T, E, F, Fut>(
    operation: F,
    timeout: Duration,
    interval: Duration,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, Failure<E>>> + Send + 'static,
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    try_until_with(operation, &RetryConfig::new(timeout, interval)).await
}

/// runs `operation` until success, a terminal failure or `config.timeout`
///
/// every retriable failure is written to `config.sink` before sleeping `config.interval`.
/// a zero interval retries back to back, a zero timeout gives up at the first poll unless
/// the first attempt is already done by then.
///
/// a panic in `operation` observed before the deadline is resumed on the caller.
/// if the runtime shuts the attempt task down before the deadline the run also reports
/// `TimedOut`, even though the full timeout has not passed.
///
/// # Panics
/// outside of a tokio runtime, the attempts are started with `tokio::spawn`
#[tracing::instrument(skip_all, fields(timeout = ?config.timeout, interval = ?config.interval))]
pub async fn try_until_with<T, E, F, Fut>(operation: F, config: &RetryConfig) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, Failure<E>>> + Send + 'static,
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let abandoned = CancellationToken::new();
    // fires on every way out of this function, including the caller dropping us
    let _abandon_on_return = abandoned.clone().drop_guard();

    let attempts = tokio::spawn(attempt_loop(
        operation,
        config.interval,
        Arc::clone(&config.sink),
        abandoned,
    ));

    match time::timeout(config.timeout, attempts).await {
        Ok(finished) => settle(finished),
        Err(_elapsed) => {
            debug!("deadline passed, leaving the attempt in flight behind");
            RetryOutcome::TimedOut
        }
    }
}

/// what the attempt task left behind when it ended before the deadline
fn settle<T, E>(finished: Result<Option<RetryOutcome<T, E>>, JoinError>) -> RetryOutcome<T, E> {
    match finished {
        Ok(Some(outcome)) => outcome,
        Ok(None) => RetryOutcome::TimedOut,
        Err(join_err) => match join_err.try_into_panic() {
            Ok(payload) => panic::resume_unwind(payload),
            Err(_) => {
                warn!("runtime shut down the attempt task, ending the run early as timed out");
                RetryOutcome::TimedOut
            }
        },
    }
}

/// `None` once the caller has stopped waiting
async fn attempt_loop<T, E, F, Fut>(
    mut operation: F,
    interval: Duration,
    sink: Arc<dyn LogSink>,
    abandoned: CancellationToken,
) -> Option<RetryOutcome<T, E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
    E: fmt::Display,
{
    loop {
        let start = Instant::now();
        match operation().await {
            Ok(value) => return Some(RetryOutcome::Ok(value)),
            Err(Failure::Terminal(cause)) => {
                return Some(RetryOutcome::Failed(Terminal::new(cause)));
            }
            Err(Failure::Retriable(cause)) => {
                sink.log(&attempt_failed_message(&cause, start.elapsed()));
            }
        }

        tokio::select! {
            () = abandoned.cancelled() => {}
            () = time::sleep(interval) => {}
        }
        if abandoned.is_cancelled() {
            debug!("nobody is waiting anymore, no further attempts");
            return None;
        }
    }
}
