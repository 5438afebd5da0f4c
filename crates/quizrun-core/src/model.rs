//! Core data model types for quizrun.
//!
//! These are the fundamental types that the whole system uses to represent
//! questions, answers and the metadata attached to them at ingestion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder rationale for questions that ship without one.
pub const DEFAULT_RATIONALE: &str = "No rationale provided.";

/// Subject assigned when a file name carries no subject.
pub const GENERAL_SUBJECT: &str = "general";

/// Grade level / identifier assigned when a file name carries none.
pub const UNKNOWN: &str = "unknown";

/// The four supported question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    #[default]
    Single,
    MultiSelect,
    FillIn,
    Ordering,
}

impl QuestionKind {
    /// Whether questions of this kind must carry a non-empty option list.
    pub fn uses_options(self) -> bool {
        !matches!(self, QuestionKind::FillIn)
    }

    /// Whether the answer of this kind is a list rather than one string.
    pub fn is_list(self) -> bool {
        matches!(self, QuestionKind::MultiSelect | QuestionKind::Ordering)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Single => write!(f, "single"),
            QuestionKind::MultiSelect => write!(f, "multi-select"),
            QuestionKind::FillIn => write!(f, "fill-in"),
            QuestionKind::Ordering => write!(f, "ordering"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(QuestionKind::Single),
            "multi-select" | "multi_select" | "multiselect" => Ok(QuestionKind::MultiSelect),
            "fill-in" | "fill_in" | "fillin" => Ok(QuestionKind::FillIn),
            "ordering" => Ok(QuestionKind::Ordering),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// An answer, canonical or user-supplied, tagged by the kind it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    Single(String),
    MultiSelect(Vec<String>),
    FillIn(String),
    Ordering(Vec<String>),
}

impl Answer {
    /// Build an answer of the given kind from a single string.
    ///
    /// List kinds wrap the string in a one-element list.
    pub fn from_text(kind: QuestionKind, text: impl Into<String>) -> Self {
        let text = text.into();
        match kind {
            QuestionKind::Single => Answer::Single(text),
            QuestionKind::FillIn => Answer::FillIn(text),
            QuestionKind::MultiSelect => Answer::MultiSelect(vec![text]),
            QuestionKind::Ordering => Answer::Ordering(vec![text]),
        }
    }

    /// Build an answer of the given kind from a list of strings.
    ///
    /// Scalar kinds receive the list joined with `,`.
    pub fn from_list(kind: QuestionKind, items: Vec<String>) -> Self {
        match kind {
            QuestionKind::MultiSelect => Answer::MultiSelect(items),
            QuestionKind::Ordering => Answer::Ordering(items),
            QuestionKind::Single => Answer::Single(items.join(",")),
            QuestionKind::FillIn => Answer::FillIn(items.join(",")),
        }
    }

    /// The question kind this answer is tagged with.
    pub fn kind(&self) -> QuestionKind {
        match self {
            Answer::Single(_) => QuestionKind::Single,
            Answer::MultiSelect(_) => QuestionKind::MultiSelect,
            Answer::FillIn(_) => QuestionKind::FillIn,
            Answer::Ordering(_) => QuestionKind::Ordering,
        }
    }

    /// Scalar coercion used by grading: strings pass through, lists are
    /// joined with `,`.
    pub fn as_text(&self) -> String {
        match self {
            Answer::Single(s) | Answer::FillIn(s) => s.clone(),
            Answer::MultiSelect(items) | Answer::Ordering(items) => items.join(","),
        }
    }

    /// List coercion used by grading. Scalars yield `None`; the evaluator
    /// decides what a scalar means for a list kind.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Answer::MultiSelect(items) | Answer::Ordering(items) => Some(items),
            Answer::Single(_) | Answer::FillIn(_) => None,
        }
    }

    /// Whether the answer counts as "provided" for a question of `kind`.
    ///
    /// Scalar kinds reject an empty string (or an empty list). List kinds
    /// accept an empty selection unless `accept_empty_selection` is false.
    pub fn is_present(&self, kind: QuestionKind, accept_empty_selection: bool) -> bool {
        let empty = match self {
            Answer::Single(s) | Answer::FillIn(s) => s.is_empty(),
            Answer::MultiSelect(items) | Answer::Ordering(items) => items.is_empty(),
        };
        if !empty {
            return true;
        }
        kind.is_list() && accept_empty_selection
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Single(s) | Answer::FillIn(s) => write!(f, "{s}"),
            Answer::MultiSelect(items) => write!(f, "{{{}}}", items.join(", ")),
            Answer::Ordering(items) => write!(f, "{}", items.join(" -> ")),
        }
    }
}

/// Where a question came from, derived from its source file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMeta {
    pub subject: String,
    pub grade_level: String,
    pub identifier: String,
    /// Original file name (or quiz code for remote quizzes).
    pub file: String,
}

impl Default for SourceMeta {
    fn default() -> Self {
        Self {
            subject: GENERAL_SUBJECT.to_string(),
            grade_level: UNKNOWN.to_string(),
            identifier: UNKNOWN.to_string(),
            file: "unknown.json".to_string(),
        }
    }
}

/// A single quiz question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier (uniqueness is enforced by the question bank).
    pub id: String,
    /// Question kind; decides how answers are graded.
    #[serde(default)]
    pub kind: QuestionKind,
    /// The question text.
    pub prompt: String,
    /// Options shown to the user. Empty for fill-in questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// The canonical answer.
    pub answer: Answer,
    #[serde(default = "default_rationale")]
    pub rationale: String,
    #[serde(default)]
    pub hint: String,
    /// Ingestion metadata used for filtering.
    #[serde(default)]
    pub source: SourceMeta,
}

fn default_rationale() -> String {
    DEFAULT_RATIONALE.to_string()
}

impl Question {
    /// Shorthand for a question with default rationale, hint and source.
    pub fn new(
        id: impl Into<String>,
        kind: QuestionKind,
        prompt: impl Into<String>,
        options: Vec<String>,
        answer: Answer,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            prompt: prompt.into(),
            options,
            answer,
            rationale: default_rationale(),
            hint: String::new(),
            source: SourceMeta::default(),
        }
    }

    pub fn with_source(mut self, source: SourceMeta) -> Self {
        self.source = source;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_and_parse() {
        assert_eq!(QuestionKind::MultiSelect.to_string(), "multi-select");
        assert_eq!(QuestionKind::FillIn.to_string(), "fill-in");
        assert_eq!(
            "multi-select".parse::<QuestionKind>().unwrap(),
            QuestionKind::MultiSelect
        );
        assert_eq!(
            "Fill_In".parse::<QuestionKind>().unwrap(),
            QuestionKind::FillIn
        );
        assert_eq!(
            "ordering".parse::<QuestionKind>().unwrap(),
            QuestionKind::Ordering
        );
        assert!("essay".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn kind_defaults_to_single() {
        assert_eq!(QuestionKind::default(), QuestionKind::Single);
        let json = r#"{"id":"q1","prompt":"p","options":["a"],"answer":{"kind":"single","value":"a"}}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::Single);
        assert_eq!(q.rationale, DEFAULT_RATIONALE);
        assert_eq!(q.source.subject, GENERAL_SUBJECT);
    }

    #[test]
    fn presence_rule_is_asymmetric_by_default() {
        assert!(!Answer::Single(String::new()).is_present(QuestionKind::Single, true));
        assert!(!Answer::FillIn(String::new()).is_present(QuestionKind::FillIn, true));
        assert!(Answer::FillIn("  ".into()).is_present(QuestionKind::FillIn, true));
        assert!(Answer::MultiSelect(vec![]).is_present(QuestionKind::MultiSelect, true));
        assert!(Answer::Ordering(vec![]).is_present(QuestionKind::Ordering, true));
        // An empty list handed to a scalar question is still absent.
        assert!(!Answer::MultiSelect(vec![]).is_present(QuestionKind::Single, true));
    }

    #[test]
    fn presence_rule_can_reject_empty_selections() {
        assert!(!Answer::MultiSelect(vec![]).is_present(QuestionKind::MultiSelect, false));
        assert!(!Answer::Ordering(vec![]).is_present(QuestionKind::Ordering, false));
        assert!(Answer::Ordering(vec!["a".into()]).is_present(QuestionKind::Ordering, false));
    }

    #[test]
    fn coercions() {
        let list = Answer::MultiSelect(vec!["A".into(), "B".into()]);
        assert_eq!(list.as_text(), "A,B");
        assert_eq!(list.as_list().unwrap().len(), 2);
        assert!(Answer::Single("x".into()).as_list().is_none());
        assert_eq!(
            Answer::from_list(QuestionKind::Single, vec!["a".into(), "b".into()]),
            Answer::Single("a,b".into())
        );
        assert_eq!(
            Answer::from_text(QuestionKind::Ordering, "a"),
            Answer::Ordering(vec!["a".into()])
        );
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = Question::new(
            "q1",
            QuestionKind::Ordering,
            "Sort ascending",
            vec!["3".into(), "1".into(), "2".into()],
            Answer::Ordering(vec!["1".into(), "2".into(), "3".into()]),
        )
        .with_hint("smallest first");
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"kind\":\"ordering\""));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
