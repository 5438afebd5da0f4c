//! Test reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::SessionResult;
use crate::session::AnswerRecord;

/// A finished (or abandoned) test, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub player: String,
    /// Code of the remote quiz, when the test came from one.
    #[serde(default)]
    pub quiz_code: Option<String>,
    pub result: SessionResult,
    /// Wall-clock time from start to finish, in milliseconds.
    pub duration_ms: u64,
}

impl TestReport {
    pub fn new(player: impl Into<String>, result: SessionResult, duration_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            player: player.into(),
            quiz_code: None,
            result,
            duration_ms,
        }
    }

    pub fn with_quiz_code(mut self, code: impl Into<String>) -> Self {
        self.quiz_code = Some(code.into());
        self
    }

    /// Answered questions that were graded wrong.
    pub fn missed(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.result.answered().filter(|r| !r.is_correct())
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: TestReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
