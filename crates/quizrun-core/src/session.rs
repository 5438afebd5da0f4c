//! The test session state machine.
//!
//! A [`TestSession`] owns the selected question sequence, a cursor into it
//! and one write-once answer slot per question:
//!
//! ```text
//! NotStarted --start--> InProgress --submit(last slot, cursor on it)--> Completed
//!      ^                                                                     |
//!      +------------------------------ reset -------------------------------+
//! ```
//!
//! Every operation either succeeds or returns a [`SessionError`] without
//! touching the session.

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::evaluator::evaluate;
use crate::model::{Answer, Question};
use crate::results::{summarize, SessionResult};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

/// Tunables for a test session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Treat an empty multi-select or ordering answer as a real answer.
    pub accept_empty_selection: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            accept_empty_selection: true,
        }
    }
}

/// A graded answer for one slot. Created once by [`TestSession::submit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    question: Question,
    user_answer: Answer,
    correct: bool,
}

impl AnswerRecord {
    pub fn question(&self) -> &Question {
        &self.question
    }

    pub fn user_answer(&self) -> &Answer {
        &self.user_answer
    }

    pub fn is_correct(&self) -> bool {
        self.correct
    }
}

/// One attempt at a fixed sequence of questions.
#[derive(Debug, Clone)]
pub struct TestSession {
    sequence: Vec<Question>,
    answers: Vec<Option<AnswerRecord>>,
    cursor: usize,
    state: SessionState,
    config: SessionConfig,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl TestSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sequence: Vec::new(),
            answers: Vec::new(),
            cursor: 0,
            state: SessionState::NotStarted,
            config,
        }
    }

    /// Begin the test on `sequence`, positioned on the first question.
    pub fn start(&mut self, sequence: Vec<Question>) -> Result<(), SessionError> {
        if self.state != SessionState::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        if sequence.is_empty() {
            return Err(SessionError::EmptySequence);
        }

        self.answers = vec![None; sequence.len()];
        self.sequence = sequence;
        self.cursor = 0;
        self.state = SessionState::InProgress;

        tracing::info!("started test with {} questions", self.sequence.len());
        Ok(())
    }

    /// Grade `answer` against the current question and record it.
    ///
    /// Returns whether the answer was correct. Wrong answers are recorded
    /// like right ones; only absent answers are rejected.
    pub fn submit(&mut self, answer: Answer) -> Result<bool, SessionError> {
        if self.state == SessionState::NotStarted {
            return Err(SessionError::NotStarted);
        }
        if self.answers[self.cursor].is_some() {
            tracing::warn!(
                "attempted to submit answer for already answered question {}",
                self.cursor + 1
            );
            return Err(SessionError::AlreadyAnswered { index: self.cursor });
        }
        if self.state == SessionState::Completed {
            return Err(SessionError::SessionCompleted);
        }

        let question = &self.sequence[self.cursor];
        if !answer.is_present(question.kind, self.config.accept_empty_selection) {
            return Err(SessionError::NoAnswerProvided);
        }

        let correct = evaluate(question, &answer);
        self.answers[self.cursor] = Some(AnswerRecord {
            question: question.clone(),
            user_answer: answer,
            correct,
        });

        tracing::info!(
            "answer submitted for question {}, correct: {correct}",
            self.cursor + 1
        );

        if self.is_finished() {
            self.state = SessionState::Completed;
            tracing::info!("test completed");
        }

        Ok(correct)
    }

    /// Move to the next question. `None` when already on the last one.
    pub fn advance(&mut self) -> Option<&Question> {
        if self.sequence.is_empty() || self.cursor + 1 >= self.sequence.len() {
            return None;
        }
        self.cursor += 1;
        tracing::debug!("moving to question {}", self.cursor + 1);
        self.sequence.get(self.cursor)
    }

    /// Move to the previous question. `None` when already on the first one.
    pub fn retreat(&mut self) -> Option<&Question> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        tracing::debug!("moving to previous question {}", self.cursor + 1);
        self.sequence.get(self.cursor)
    }

    /// Clear everything and return to [`SessionState::NotStarted`].
    pub fn reset(&mut self) {
        self.sequence.clear();
        self.answers.clear();
        self.cursor = 0;
        self.state = SessionState::NotStarted;
        tracing::debug!("test state reset");
    }

    /// The question under the cursor, if a test is running.
    pub fn current(&self) -> Option<&Question> {
        self.sequence.get(self.cursor)
    }

    /// True once the last question is under the cursor and answered.
    pub fn is_finished(&self) -> bool {
        !self.sequence.is_empty()
            && self.cursor == self.sequence.len() - 1
            && self.answers[self.cursor].is_some()
    }

    /// Whether the slot under the cursor holds an answer.
    pub fn is_answered(&self) -> bool {
        self.is_answered_at(self.cursor)
    }

    /// Whether slot `index` holds an answer. Out-of-range slots never do.
    pub fn is_answered_at(&self, index: usize) -> bool {
        matches!(self.answers.get(index), Some(Some(_)))
    }

    pub fn current_record(&self) -> Option<&AnswerRecord> {
        self.record_at(self.cursor)
    }

    pub fn record_at(&self, index: usize) -> Option<&AnswerRecord> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    pub fn records(&self) -> &[Option<AnswerRecord>] {
        &self.answers
    }

    pub fn questions(&self) -> &[Question] {
        &self.sequence
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        !self.sequence.is_empty() && self.cursor == self.sequence.len() - 1
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Score the session as it stands.
    pub fn summarize(&self) -> SessionResult {
        summarize(self)
    }
}
