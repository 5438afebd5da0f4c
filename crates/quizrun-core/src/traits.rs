//! Trait definitions for the collaborators around the test engine.
//!
//! `QuizBackend` is implemented by the `quizrun-remote` crate;
//! `SessionObserver` by front-ends that want to react to engine events.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::progress::Badge;
use crate::results::SessionResult;
use crate::session::AnswerRecord;

// ---------------------------------------------------------------------------
// Remote quiz backend
// ---------------------------------------------------------------------------

/// A service that hosts quizzes and collects finished attempts.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch the questions of the quiz published under `quiz_code`.
    async fn load_quiz(&self, quiz_code: &str) -> anyhow::Result<Vec<Question>>;

    /// Open a scored attempt and return its session ID.
    async fn start_session(&self, quiz_code: &str, player_name: &str) -> anyhow::Result<String>;

    /// Hand in the answer records of a finished attempt.
    async fn submit_results(
        &self,
        session_id: &str,
        records: &[Option<AnswerRecord>],
    ) -> anyhow::Result<SubmitReceipt>;
}

/// Acknowledgement returned after submitting results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Session observer
// ---------------------------------------------------------------------------

/// Receives engine events, e.g. to redraw a display or log progress.
pub trait SessionObserver: Send + Sync {
    fn on_test_started(&self, total: usize);
    fn on_answer_recorded(&self, index: usize, record: &AnswerRecord);
    fn on_badge_unlocked(&self, badge: Badge, stars: u32);
    fn on_test_finished(&self, result: &SessionResult);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_test_started(&self, _: usize) {}
    fn on_answer_recorded(&self, _: usize, _: &AnswerRecord) {}
    fn on_badge_unlocked(&self, _: Badge, _: u32) {}
    fn on_test_finished(&self, _: &SessionResult) {}
}
