//! HTTP client for the hosted quiz service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizrun_core::model::{Question, SourceMeta};
use quizrun_core::parser::{convert_items, raw_answer, RawQuestion};
use quizrun_core::session::AnswerRecord;
use quizrun_core::traits::{QuizBackend, SubmitReceipt};

use crate::error::RemoteError;

pub const DEFAULT_BASE_URL: &str = "https://quiz-backend-613338700440.us-central1.run.app";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Quiz service reached over HTTP.
pub struct HttpBackend {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: Option<String>, timeout_secs: u64) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RemoteError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> RemoteError {
        if e.is_timeout() {
            RemoteError::Timeout(self.timeout_secs)
        } else {
            RemoteError::NetworkError(e.to_string())
        }
    }

    /// Read a `{success, message?, ...}` envelope, turning failures into errors.
    async fn read_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, RemoteError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;

        let envelope = serde_json::from_str::<Envelope>(&body);
        if status >= 400 {
            let message = envelope
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| if body.is_empty() { fallback.to_string() } else { body });
            return Err(RemoteError::ApiError { status, message });
        }

        let envelope = envelope
            .map_err(|e| RemoteError::InvalidResponse(format!("failed to parse response: {e}")))?;
        if !envelope.success {
            return Err(RemoteError::Rejected(
                envelope.message.unwrap_or_else(|| fallback.to_string()),
            ));
        }

        serde_json::from_str::<T>(&body)
            .map_err(|e| RemoteError::InvalidResponse(format!("failed to parse response: {e}")))
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct LoadQuizResponse {
    #[serde(default)]
    quiz: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct StartRequest<'a> {
    quiz_code: &'a str,
    player_name: &'a str,
}

#[derive(Deserialize)]
struct StartResponse {
    session_id: String,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    session_id: &'a str,
    user_answers: Vec<Option<WireAnswer>>,
}

/// One graded answer as the service stores it: the question in raw item
/// form and the user's raw answer value.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireAnswer {
    question: RawQuestion,
    user_answer: serde_json::Value,
    correct: bool,
}

impl From<&AnswerRecord> for WireAnswer {
    fn from(record: &AnswerRecord) -> Self {
        Self {
            question: RawQuestion::from(record.question()),
            user_answer: raw_answer(record.user_answer()),
            correct: record.is_correct(),
        }
    }
}

/// Metadata attached to questions fetched by code.
pub fn remote_source(quiz_code: &str) -> SourceMeta {
    SourceMeta {
        identifier: quiz_code.to_string(),
        file: quiz_code.to_string(),
        ..SourceMeta::default()
    }
}

#[async_trait]
impl QuizBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self))]
    async fn load_quiz(&self, quiz_code: &str) -> anyhow::Result<Vec<Question>> {
        let code = quiz_code.trim();
        if code.is_empty() {
            return Err(RemoteError::EmptyQuizCode.into());
        }

        let response = self
            .client
            .get(format!("{}/api/load-quiz/{code}", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let loaded: LoadQuizResponse =
            Self::read_envelope(response, "Failed to load quiz.").await?;

        let (questions, skipped) = convert_items(loaded.quiz, code, &remote_source(code));
        if !skipped.is_empty() {
            tracing::warn!("quiz {code}: skipped {} malformed questions", skipped.len());
        }
        tracing::info!("loaded {} questions for quiz {code}", questions.len());
        Ok(questions)
    }

    #[instrument(skip(self))]
    async fn start_session(&self, quiz_code: &str, player_name: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/api/quiz-session/start", self.base_url))
            .json(&StartRequest {
                quiz_code: quiz_code.trim(),
                player_name,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let started: StartResponse =
            Self::read_envelope(response, "Could not start session.").await?;
        tracing::info!("remote session {} started", started.session_id);
        Ok(started.session_id)
    }

    #[instrument(skip(self, records), fields(answers = records.len()))]
    async fn submit_results(
        &self,
        session_id: &str,
        records: &[Option<AnswerRecord>],
    ) -> anyhow::Result<SubmitReceipt> {
        let body = SubmitRequest {
            session_id,
            user_answers: records
                .iter()
                .map(|r| r.as_ref().map(WireAnswer::from))
                .collect(),
        };

        let response = self
            .client
            .post(format!("{}/api/quiz-session/submit", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let receipt: SubmitReceipt =
            Self::read_envelope(response, "Could not submit results.").await?;
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizrun_core::model::{Answer, QuestionKind};
    use quizrun_core::session::TestSession;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend(server: &MockServer) -> HttpBackend {
        HttpBackend::new(Some(server.uri()), 5).unwrap()
    }

    #[tokio::test]
    async fn load_quiz_converts_items() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "success": true,
            "quiz": [
                {"Question": "2 + 2?", "Options": ["3", "4"], "answer": "4"},
                {"Question": "Half of 3?", "answer": 1.5},
                {"Options": ["no prompt"]}
            ]
        });

        Mock::given(method("GET"))
            .and(path("/api/load-quiz/ABC123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let questions = backend(&server).load_quiz(" ABC123 ").await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, "ABC123_0");
        assert_eq!(questions[0].kind, QuestionKind::Single);
        assert_eq!(questions[1].kind, QuestionKind::FillIn);
        assert_eq!(questions[1].answer, Answer::FillIn("1.5".into()));
        assert_eq!(questions[1].source.identifier, "ABC123");
    }

    #[tokio::test]
    async fn load_quiz_skips_malformed_items_individually() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/load-quiz/MIX"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "quiz": [
                    {"Question": "ok", "answer": "4"},
                    {"Question": 7, "Options": "x", "answer": "x"},
                    "not an item"
                ]
            })))
            .mount(&server)
            .await;

        let questions = backend(&server).load_quiz("MIX").await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, "MIX_0");
        assert_eq!(questions[0].prompt, "ok");
    }

    #[tokio::test]
    async fn blank_code_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = backend(&server).load_quiz("   ").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RemoteError>(),
            Some(RemoteError::EmptyQuizCode)
        ));
    }

    #[tokio::test]
    async fn unsuccessful_envelope_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/load-quiz/NOPE"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": false, "message": "Quiz not found."}),
            ))
            .mount(&server)
            .await;

        let err = backend(&server).load_quiz("NOPE").await.unwrap_err();
        assert_eq!(err.to_string(), "Quiz not found.");
    }

    #[tokio::test]
    async fn error_status_uses_service_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/load-quiz/GONE"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                serde_json::json!({"success": false, "message": "No such quiz"}),
            ))
            .mount(&server)
            .await;

        let err = backend(&server).load_quiz("GONE").await.unwrap_err();
        match err.downcast_ref::<RemoteError>() {
            Some(RemoteError::ApiError { status, message }) => {
                assert_eq!(*status, 404);
                assert_eq!(message, "No such quiz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/quiz-session/start"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = backend(&server).start_session("ABC", "ada").await.unwrap_err();
        assert!(err.to_string().contains("invalid response"));
    }

    #[tokio::test]
    async fn start_session_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/quiz-session/start"))
            .and(body_partial_json(
                serde_json::json!({"quiz_code": "ABC", "player_name": "ada"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": true, "session_id": "sess-42"}),
            ))
            .mount(&server)
            .await;

        let id = backend(&server).start_session("ABC", "ada").await.unwrap();
        assert_eq!(id, "sess-42");
    }

    #[tokio::test]
    async fn submit_sends_one_entry_per_slot() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/quiz-session/submit"))
            .and(body_partial_json(serde_json::json!({
                "session_id": "sess-42",
                "user_answers": [
                    {"question": {"Question": "2 + 2?", "answer": "4", "type": "fill-in"},
                     "userAnswer": "4", "correct": true},
                    {"question": {"Question": "Pick evens", "Options": ["1", "2", "4"],
                                  "answer": ["2", "4"], "type": "multi-select"},
                     "userAnswer": ["2"], "correct": false},
                    null
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": true, "message": "Saved"}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let questions = vec![
            Question::new("ABC_0", QuestionKind::FillIn, "2 + 2?", vec![], Answer::FillIn("4".into())),
            Question::new(
                "ABC_1",
                QuestionKind::MultiSelect,
                "Pick evens",
                vec!["1".into(), "2".into(), "4".into()],
                Answer::MultiSelect(vec!["2".into(), "4".into()]),
            ),
            Question::new("ABC_2", QuestionKind::FillIn, "3 + 3?", vec![], Answer::FillIn("6".into())),
        ];
        let mut session = TestSession::default();
        session.start(questions).unwrap();
        session.submit(Answer::FillIn("4".into())).unwrap();
        session.advance();
        session.submit(Answer::MultiSelect(vec!["2".into()])).unwrap();

        let receipt = backend(&server)
            .submit_results("sess-42", session.records())
            .await
            .unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.message.as_deref(), Some("Saved"));
    }
}
