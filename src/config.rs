use crate::log_sink::{LogSink, TracingSink};
use std::{fmt, sync::Arc, time::Duration};

/// how long a run may take in total, how long to wait between attempts
/// and where the diagnostics of retried attempts go
///
/// neither duration is validated, see `try_until` for what zero means
#[derive(Clone)]
pub struct RetryConfig {
    pub timeout: Duration,
    pub interval: Duration,
    pub sink: Arc<dyn LogSink>,
}

impl RetryConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            sink: Arc::new(TracingSink),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT, Self::DEFAULT_INTERVAL)
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("timeout", &self.timeout)
            .field("interval", &self.interval)
            .field("sink", &"<sink>")
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::RetryConfig;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn defaults() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert_eq!(cfg.interval, Duration::from_millis(100));
        assert!(format!("{cfg:?}").contains("interval: 100ms"));
    }

    #[test]
    fn builders_replace_fields() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen2 = Arc::clone(&seen);
        let cfg = RetryConfig::default()
            .with_timeout(Duration::from_secs(1))
            .with_interval(Duration::ZERO)
            .with_sink(move |m: &str| seen2.lock().unwrap().push(m.to_owned()));
        assert_eq!(cfg.timeout, Duration::from_secs(1));
        assert_eq!(cfg.interval, Duration::ZERO);
        cfg.sink.log("hello");
        assert_eq!(*seen.lock().unwrap(), vec!["hello"]);
    }
}
