//! what a whole run ended with
//! only the final disposition is kept, the retriable failures along the way were only logged

use crate::retryable::Terminal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T, E> {
    /// some attempt succeeded before the deadline
    Ok(T),
    /// the deadline passed before a success or a terminal failure
    TimedOut,
    /// an attempt marked its failure as terminal
    Failed(Terminal<E>),
}

impl<T, E> RetryOutcome<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn terminal_cause(&self) -> Option<&E> {
        match self {
            Self::Failed(t) => Some(t.cause()),
            _ => None,
        }
    }

    pub fn into_result(self) -> Result<T, RetryError<E>> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::TimedOut => Err(RetryError::TimedOut),
            Self::Failed(t) => Err(RetryError::Terminal(t)),
        }
    }
}

/// did the run end because the operation gave up, rather than by success or the deadline
pub fn is_terminal_failure<T, E>(outcome: &RetryOutcome<T, E>) -> bool {
    outcome.is_terminal_failure()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    #[error("timed out")]
    TimedOut,
    #[error(transparent)]
    Terminal(Terminal<E>),
}

impl<E> RetryError<E> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

#[cfg(test)]
mod test {
    use super::{is_terminal_failure, RetryOutcome};
    use crate::retryable::Terminal;

    #[derive(Debug, PartialEq)]
    struct Wut;

    impl std::fmt::Display for Wut {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("wut")
        }
    }

    impl std::error::Error for Wut {}

    #[test]
    fn outcomes_are_distinguishable() {
        let ok: RetryOutcome<u8, Wut> = RetryOutcome::Ok(3);
        let timed_out: RetryOutcome<u8, Wut> = RetryOutcome::TimedOut;
        let failed: RetryOutcome<u8, Wut> = RetryOutcome::Failed(Terminal::new(Wut));
        assert!(ok.is_ok() && !ok.is_timed_out() && !is_terminal_failure(&ok));
        assert!(timed_out.is_timed_out() && !is_terminal_failure(&timed_out));
        assert!(is_terminal_failure(&failed) && !failed.is_timed_out());
        assert_eq!(failed.terminal_cause(), Some(&Wut));
        assert_eq!(timed_out, RetryOutcome::TimedOut);
        assert_ne!(timed_out, failed);
    }

    #[test]
    fn into_result_for_question_mark() {
        let ok: RetryOutcome<u8, Wut> = RetryOutcome::Ok(3);
        assert_eq!(ok.into_result(), Ok(3));

        let timed_out: RetryOutcome<u8, Wut> = RetryOutcome::TimedOut;
        let err = timed_out.into_result().unwrap_err();
        assert_eq!(err.to_string(), "timed out");
        assert!(!err.is_terminal());

        let failed: RetryOutcome<u8, Wut> = RetryOutcome::Failed(Terminal::new(Wut));
        let err = failed.into_result().unwrap_err();
        assert!(err.is_terminal());
        assert_eq!(err.to_string(), "terminable: wut");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.to_string().contains("wut"));
    }
}
