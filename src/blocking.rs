//! the same runner for synchronous code, the attempts get their own OS thread
//!
//! the caller blocks on a channel with room for one outcome, so the attempt thread can always hand
//! its outcome over and exit even after the caller gave up. the thread checks before each attempt
//! whether the caller is still waiting, a sleep that is already underway is not interrupted.

use crate::config::RetryConfig;
use crate::log_sink::{attempt_failed_message, LogSink};
use crate::outcome::RetryOutcome;
use crate::retryable::{Failure, Terminal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{fmt, panic, thread};
use tracing::debug;

/// blocking `try_until_with` using the default log sink
pub fn try_until<T, E, F>(operation: F, timeout: Duration, interval: Duration) -> RetryOutcome<T, E>
where
    F: FnMut() -> Result<T, Failure<E>> + Send + 'static,
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    try_until_with(operation, &RetryConfig::new(timeout, interval))
}

/// blocks until `operation` succeeds, fails terminally or `config.timeout` passes
///
/// do not call this from inside an async runtime worker, use `crate::try_until_with` there.
#[tracing::instrument(skip_all, fields(timeout = ?config.timeout, interval = ?config.interval))]
pub fn try_until_with<T, E, F>(operation: F, config: &RetryConfig) -> RetryOutcome<T, E>
where
    F: FnMut() -> Result<T, Failure<E>> + Send + 'static,
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let (finished_tx, finished_rx) = mpsc::sync_channel(1);
    let abandoned = Arc::new(AtomicBool::new(false));

    let attempts = {
        let abandoned = Arc::clone(&abandoned);
        let sink = Arc::clone(&config.sink);
        let interval = config.interval;
        thread::spawn(move || {
            if let Some(outcome) = attempt_loop(operation, interval, sink.as_ref(), &abandoned) {
                // a full slot or a departed caller are both fine here
                let _ = finished_tx.try_send(outcome);
            }
        })
    };

    match finished_rx.recv_timeout(config.timeout) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => {
            abandoned.store(true, Ordering::Release);
            debug!("deadline passed, leaving the attempt in flight behind");
            RetryOutcome::TimedOut
        }
        Err(RecvTimeoutError::Disconnected) => match attempts.join() {
            Err(payload) => panic::resume_unwind(payload),
            Ok(()) => RetryOutcome::TimedOut,
        },
    }
}

fn attempt_loop<T, E, F>(
    mut operation: F,
    interval: Duration,
    sink: &dyn LogSink,
    abandoned: &AtomicBool,
) -> Option<RetryOutcome<T, E>>
where
    F: FnMut() -> Result<T, Failure<E>>,
    E: fmt::Display,
{
    loop {
        if abandoned.load(Ordering::Acquire) {
            debug!("nobody is waiting anymore, no further attempts");
            return None;
        }
        let start = Instant::now();
        match operation() {
            Ok(value) => return Some(RetryOutcome::Ok(value)),
            Err(Failure::Terminal(cause)) => {
                return Some(RetryOutcome::Failed(Terminal::new(cause)));
            }
            Err(Failure::Retriable(cause)) => {
                sink.log(&attempt_failed_message(&cause, start.elapsed()));
            }
        }
        thread::sleep(interval);
    }
}
