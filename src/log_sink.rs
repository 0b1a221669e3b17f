//! where the diagnostics for retried attempts go
//! a sink only receives messages, it has no say in whether the run continues

use std::{fmt, time::Duration};

pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// sends every diagnostic to `tracing` as a warning
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::warn!(target: "timed_retry", "{message}");
    }
}

/// the line written for one retried attempt
/// elapsed is cut down to whole milliseconds
pub(crate) fn attempt_failed_message(cause: &dyn fmt::Display, elapsed: Duration) -> String {
    let elapsed = Duration::from_millis(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
    format!("try (attempt took {elapsed:?}): {cause}")
}

#[cfg(test)]
mod test {
    use super::{attempt_failed_message, LogSink, TracingSink};
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn elapsed_truncated_to_millis() {
        let msg = attempt_failed_message(&"whoops", Duration::from_micros(12_345));
        assert_eq!(msg, "try (attempt took 12ms): whoops");
        let msg = attempt_failed_message(&"whoops", Duration::from_micros(999));
        assert_eq!(msg, "try (attempt took 0ns): whoops");
    }

    #[test]
    fn closures_are_sinks() {
        let seen = Mutex::new(Vec::new());
        let sink = |m: &str| seen.lock().unwrap().push(m.to_owned());
        sink.log("one");
        sink.log("two");
        assert_eq!(*seen.lock().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn tracing_sink_without_subscriber() {
        TracingSink.log("nobody listening");
    }
}
