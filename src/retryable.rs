//! classify what one attempt of the operation produced
//! an `Ok` ends the run, a `Failure::Retriable` gets logged and tried again after the interval
//! and a `Failure::Terminal` ends the run with that cause

use std::{error::Error, fmt, ops::Deref};

/// why a single attempt did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure<E> {
    Retriable(E),
    Terminal(E),
}

impl<E> Failure<E> {
    pub fn retriable(cause: E) -> Self {
        Self::Retriable(cause)
    }

    pub fn terminal(cause: E) -> Self {
        Self::Terminal(cause)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    pub fn cause(&self) -> &E {
        match self {
            Self::Retriable(e) | Self::Terminal(e) => e,
        }
    }

    pub fn into_cause(self) -> E {
        match self {
            Self::Retriable(e) | Self::Terminal(e) => e,
        }
    }
}

/// plain errors are retriable unless they were explicitly marked
/// so `?` inside an operation keeps trying
impl<E> From<E> for Failure<E> {
    fn from(cause: E) -> Self {
        Self::Retriable(cause)
    }
}

/// the operation gives up on its own, the runner will not call it again
pub fn mark_terminal<E>(cause: E) -> Failure<E> {
    Failure::Terminal(cause)
}

/// the cause of a run that ended on a terminal failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal<E>(E);

impl<E> Terminal<E> {
    pub(crate) fn new(cause: E) -> Self {
        Self(cause)
    }

    pub fn cause(&self) -> &E {
        &self.0
    }

    pub fn into_inner(self) -> E {
        self.0
    }
}

impl<E> Deref for Terminal<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.0
    }
}

impl<E: fmt::Display> fmt::Display for Terminal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "terminable: {}", self.0)
    }
}

impl<E: Error + 'static> Error for Terminal<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        // the display already carries the cause's message
        self.0.source()
    }
}
