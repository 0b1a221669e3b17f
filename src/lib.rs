pub mod blocking;
pub mod config;
pub mod log_sink;
pub mod outcome;
pub mod retryable;
pub mod try_again;

pub use config::RetryConfig;
pub use log_sink::{LogSink, TracingSink};
pub use outcome::{is_terminal_failure, RetryError, RetryOutcome};
pub use retryable::{mark_terminal, Failure, Terminal};
pub use try_again::{try_until, try_until_with};
