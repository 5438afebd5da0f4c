//! Test session error types.
//!
//! Every engine failure is recoverable: the session is left untouched and the
//! caller decides what, if anything, to show the user.

use thiserror::Error;

/// Errors returned by the question selector and the test session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The pool cannot fill a test of the requested length.
    #[error("not enough questions: requested {requested}, only {available} available")]
    InsufficientPool { available: usize, requested: usize },

    /// A session was started with zero questions.
    #[error("cannot start a test with no questions")]
    EmptySequence,

    /// The session has already been started.
    #[error("test already started")]
    AlreadyStarted,

    /// No test is in progress.
    #[error("no test in progress")]
    NotStarted,

    /// The current question already has a recorded answer. `index` is
    /// zero-based; the message numbers questions from 1.
    #[error("question {} has already been answered", .index + 1)]
    AlreadyAnswered { index: usize },

    /// The submitted answer is empty.
    #[error("please provide an answer before submitting")]
    NoAnswerProvided,

    /// The test is over; remaining unanswered slots are closed.
    #[error("test already completed")]
    SessionCompleted,
}

impl SessionError {
    /// Returns `true` for errors the front-end should swallow without
    /// telling the user (re-submitting an answered question).
    pub fn is_silent(&self) -> bool {
        matches!(self, SessionError::AlreadyAnswered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_already_answered_is_silent() {
        assert!(SessionError::AlreadyAnswered { index: 0 }.is_silent());
        assert!(!SessionError::NoAnswerProvided.is_silent());
        assert!(!SessionError::EmptySequence.is_silent());
    }

    #[test]
    fn messages_carry_counts() {
        let err = SessionError::InsufficientPool {
            available: 2,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "not enough questions: requested 5, only 2 available"
        );
    }

    #[test]
    fn already_answered_numbers_from_one() {
        let err = SessionError::AlreadyAnswered { index: 0 };
        assert_eq!(err.to_string(), "question 1 has already been answered");
    }
}
