//! Mock backend for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizrun_core::model::Question;
use quizrun_core::session::AnswerRecord;
use quizrun_core::traits::{QuizBackend, SubmitReceipt};

use crate::error::RemoteError;

/// A mock quiz service for exercising the engine without a real server.
///
/// Serves canned quizzes by code and remembers what was submitted.
pub struct MockBackend {
    /// Map of quiz code → questions.
    quizzes: HashMap<String, Vec<Question>>,
    /// Number of calls made, across all methods.
    call_count: AtomicU32,
    /// Last `(session_id, records)` submitted.
    last_submission: Mutex<Option<(String, Vec<Option<AnswerRecord>>)>>,
}

impl MockBackend {
    pub fn new(quizzes: HashMap<String, Vec<Question>>) -> Self {
        Self {
            quizzes,
            call_count: AtomicU32::new(0),
            last_submission: Mutex::new(None),
        }
    }

    /// A backend serving a single quiz.
    pub fn with_quiz(code: &str, questions: Vec<Question>) -> Self {
        Self::new(HashMap::from([(code.to_string(), questions)]))
    }

    /// Get the number of calls made to this backend.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last submission made to this backend.
    pub fn last_submission(&self) -> Option<(String, Vec<Option<AnswerRecord>>)> {
        self.last_submission.lock().ok().and_then(|s| s.clone())
    }
}

#[async_trait]
impl QuizBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load_quiz(&self, quiz_code: &str) -> anyhow::Result<Vec<Question>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let code = quiz_code.trim();
        if code.is_empty() {
            return Err(RemoteError::EmptyQuizCode.into());
        }
        self.quizzes
            .get(code)
            .cloned()
            .ok_or_else(|| RemoteError::Rejected(format!("quiz {code} not found")).into())
    }

    async fn start_session(&self, quiz_code: &str, player_name: &str) -> anyhow::Result<String> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(format!("mock-{}-{player_name}-{n}", quiz_code.trim()))
    }

    async fn submit_results(
        &self,
        session_id: &str,
        records: &[Option<AnswerRecord>],
    ) -> anyhow::Result<SubmitReceipt> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_submission.lock() {
            *last = Some((session_id.to_string(), records.to_vec()));
        }
        Ok(SubmitReceipt {
            success: true,
            message: Some(format!("{} answers received", records.iter().flatten().count())),
        })
    }
}
