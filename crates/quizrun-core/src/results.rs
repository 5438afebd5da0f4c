//! Session scoring.

use serde::{Deserialize, Serialize};

use crate::session::{AnswerRecord, TestSession};

/// Final (or running) score of a test session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    /// `100 * correct_count / total`, or 0 for an empty session.
    pub score_percent: f64,
    pub correct_count: usize,
    /// Number of questions in the session.
    pub total: usize,
    /// One entry per slot; `None` for questions left unanswered.
    pub records: Vec<Option<AnswerRecord>>,
}

impl SessionResult {
    /// Slots without an answer. They count as incorrect.
    pub fn unanswered(&self) -> usize {
        self.records.iter().filter(|r| r.is_none()).count()
    }

    pub fn incorrect_count(&self) -> usize {
        self.total - self.correct_count
    }

    /// Iterate over the answered slots only.
    pub fn answered(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.records.iter().flatten()
    }
}

/// Derive the score of `session` from its answer records.
pub fn summarize(session: &TestSession) -> SessionResult {
    let records = session.records().to_vec();
    let correct_count = records.iter().flatten().filter(|r| r.is_correct()).count();
    let total = session.len();
    let score_percent = if total > 0 {
        correct_count as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    SessionResult {
        score_percent,
        correct_count,
        total,
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, Question, QuestionKind};

    fn session_of(n: usize) -> TestSession {
        let mut session = TestSession::default();
        session
            .start(
                (0..n)
                    .map(|i| {
                        Question::new(
                            format!("q{i}"),
                            QuestionKind::FillIn,
                            "2 + 2 = ?",
                            vec![],
                            Answer::FillIn("4".into()),
                        )
                    })
                    .collect(),
            )
            .unwrap();
        session
    }

    #[test]
    fn empty_session_scores_zero() {
        let result = summarize(&TestSession::default());
        assert_eq!(result.total, 0);
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.score_percent, 0.0);
        assert!(result.records.is_empty());
    }

    #[test]
    fn unanswered_slots_count_as_incorrect() {
        let mut session = session_of(4);
        session.submit(Answer::FillIn("4".into())).unwrap();
        session.advance();
        session.submit(Answer::FillIn("5".into())).unwrap();

        let result = summarize(&session);
        assert_eq!(result.total, 4);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.incorrect_count(), 3);
        assert_eq!(result.unanswered(), 2);
        assert_eq!(result.answered().count(), 2);
        assert_eq!(result.score_percent, 25.0);
    }

    #[test]
    fn all_correct_is_one_hundred() {
        let mut session = session_of(2);
        session.submit(Answer::FillIn("4.0".into())).unwrap();
        session.advance();
        session.submit(Answer::FillIn(" 4 ".into())).unwrap();
        assert_eq!(summarize(&session).score_percent, 100.0);
    }

    #[test]
    fn summarize_is_idempotent() {
        let mut session = session_of(3);
        session.submit(Answer::FillIn("4".into())).unwrap();
        session.advance();
        session.advance();
        session.submit(Answer::FillIn("x".into())).unwrap();

        let first = summarize(&session);
        let second = summarize(&session);
        assert_eq!(first, second);
    }
}
