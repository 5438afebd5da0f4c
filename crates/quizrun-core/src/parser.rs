//! Question file parser.
//!
//! Loads question banks from JSON files and directories, derives filter
//! metadata from file names, and validates the result.
//!
//! A file holds one raw item or an array of them:
//!
//! ```json
//! [{ "Question": "2 + 2 = ?", "Options": ["3", "4"], "answer": "4",
//!    "Rationale": "basic addition", "hint": "count", "type": "single" }]
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    Answer, Question, QuestionKind, SourceMeta, DEFAULT_RATIONALE, GENERAL_SUBJECT, UNKNOWN,
};

/// One question as it appears in a bank file or a remote quiz payload.
///
/// Text fields accept any JSON scalar; numbers and booleans are stringified.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "Question", default, skip_serializing_if = "Option::is_none")]
    pub question: Option<Value>,
    #[serde(rename = "Options", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    #[serde(rename = "Rationale", default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl RawQuestion {
    /// Convert into a [`Question`], or explain why the item is unusable.
    pub fn into_question(self, id: String, source: SourceMeta) -> Result<Question, String> {
        let prompt = match text_field(self.question) {
            Some(q) => q,
            None => return Err("missing \"Question\" field".into()),
        };
        let answer = match self.answer {
            Some(Value::Null) | None => return Err("missing \"answer\" field".into()),
            Some(a) => a,
        };

        let kind = match &self.kind {
            Some(k) if !k.is_empty() => k.parse::<QuestionKind>()?,
            _ => match (&self.options, &answer) {
                (Some(_), Value::Array(_)) => QuestionKind::MultiSelect,
                (Some(_), _) => QuestionKind::Single,
                (None, _) => QuestionKind::FillIn,
            },
        };

        let options: Vec<String> = self
            .options
            .unwrap_or_default()
            .iter()
            .map(value_to_text)
            .collect();
        if kind.uses_options() && options.is_empty() {
            return Err(format!(
                "type \"{kind}\" but missing or empty \"Options\" array"
            ));
        }

        let answer = match answer {
            Value::Array(items) => {
                Answer::from_list(kind, items.iter().map(value_to_text).collect())
            }
            scalar => Answer::from_text(kind, value_to_text(&scalar)),
        };

        Ok(Question {
            id,
            kind,
            prompt,
            options,
            answer,
            rationale: text_field(self.rationale)
                .unwrap_or_else(|| DEFAULT_RATIONALE.to_string()),
            hint: text_field(self.hint).unwrap_or_default(),
            source,
        })
    }
}

impl From<&Question> for RawQuestion {
    fn from(q: &Question) -> Self {
        Self {
            question: Some(Value::String(q.prompt.clone())),
            options: (!q.options.is_empty())
                .then(|| q.options.iter().cloned().map(Value::String).collect()),
            answer: Some(raw_answer(&q.answer)),
            rationale: Some(Value::String(q.rationale.clone())),
            hint: (!q.hint.is_empty()).then(|| Value::String(q.hint.clone())),
            kind: Some(q.kind.to_string()),
        }
    }
}

/// An answer in raw item form: a string for scalar kinds, an array of
/// strings for list kinds.
pub fn raw_answer(answer: &Answer) -> Value {
    match answer {
        Answer::Single(s) | Answer::FillIn(s) => Value::String(s.clone()),
        Answer::MultiSelect(items) | Answer::Ordering(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
    }
}

// JSON scalars stringify the way they are written; strings lose their quotes.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Null, false, 0 and "" count as absent.
fn text_field(value: Option<Value>) -> Option<String> {
    let value = value?;
    let present = match &value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    present.then(|| value_to_text(&value))
}

/// A raw item that could not be turned into a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub index: usize,
    pub reason: String,
}

/// Result of parsing one question file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub source: SourceMeta,
    pub questions: Vec<Question>,
    pub skipped: Vec<SkippedItem>,
}

/// Derive subject, grade level and identifier from a bank file name.
///
/// `math_grade5_fractions_intro.json` gives subject `math`, grade `5`,
/// identifier `fractions_intro`.
pub fn parse_filename(file_name: &str) -> SourceMeta {
    let stem = file_name.replace(".json", "");
    let parts: Vec<&str> = stem.split('_').collect();

    let subject = match parts.first() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => GENERAL_SUBJECT.to_string(),
    };

    let grade_index = parts.iter().position(|p| {
        p.strip_prefix("grade")
            .is_some_and(|n| n.starts_with(|c: char| c.is_ascii_digit()))
    });

    let (grade_level, identifier) = match grade_index {
        Some(gi) => (
            parts[gi].trim_start_matches("grade").to_string(),
            parts[gi + 1..].join("_"),
        ),
        None => (UNKNOWN.to_string(), parts.get(1..).unwrap_or_default().join("_")),
    };

    let identifier = identifier.trim_end_matches('_');
    let identifier = if identifier.is_empty() {
        UNKNOWN.to_string()
    } else {
        identifier.to_string()
    };

    SourceMeta {
        subject,
        grade_level,
        identifier,
        file: file_name.to_string(),
    }
}

/// Convert a list of raw JSON items, keeping the good ones and reporting the
/// rest. An item that does not have the raw question shape is skipped on its
/// own.
///
/// Question IDs are `{id_prefix}_{index}`.
pub fn convert_items(
    items: Vec<Value>,
    id_prefix: &str,
    source: &SourceMeta,
) -> (Vec<Question>, Vec<SkippedItem>) {
    let mut questions = Vec::new();
    let mut skipped = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        let converted = serde_json::from_value::<RawQuestion>(item)
            .map_err(|e| format!("malformed item: {e}"))
            .and_then(|raw| raw.into_question(format!("{id_prefix}_{index}"), source.clone()));
        match converted {
            Ok(q) => questions.push(q),
            Err(reason) => {
                tracing::warn!("skipping item {index} in \"{id_prefix}\": {reason}");
                skipped.push(SkippedItem { index, reason });
            }
        }
    }

    (questions, skipped)
}

/// Parse a single JSON question file.
pub fn parse_question_file(path: &Path) -> Result<ParsedFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_questions_str(&content, &file_name)
}

/// Parse JSON question content as if it came from `file_name`.
pub fn parse_questions_str(content: &str, file_name: &str) -> Result<ParsedFile> {
    let value: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {file_name}"))?;

    let items = match value {
        Value::Array(items) => items,
        single => vec![single],
    };

    let source = parse_filename(file_name);
    let (questions, skipped) = convert_items(items, file_name, &source);

    Ok(ParsedFile {
        source,
        questions,
        skipped,
    })
}

/// Recursively load every `.json` question file under `dir`.
pub fn load_question_directory(dir: &Path) -> Result<Vec<ParsedFile>> {
    let mut files = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            files.extend(load_question_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            match parse_question_file(&path) {
                Ok(parsed) => files.push(parsed),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        } else {
            tracing::warn!("skipping {}: not a JSON file", path.display());
        }
    }

    Ok(files)
}

/// Load a file or a directory of files.
pub fn load_path(path: &Path) -> Result<Vec<ParsedFile>> {
    if path.is_dir() {
        load_question_directory(path)
    } else {
        Ok(vec![parse_question_file(path)?])
    }
}

/// A warning from question validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate questions for issues that make them ungradeable or confusing.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for q in questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in questions {
        let warn = |message: String| ValidationWarning {
            question_id: Some(q.id.clone()),
            message,
        };

        if q.prompt.trim().is_empty() {
            warnings.push(warn("prompt is empty".into()));
        }

        match (&q.kind, &q.answer) {
            (QuestionKind::Single, answer) => {
                let text = answer.as_text();
                if !q.options.contains(&text) {
                    warnings.push(warn(format!("answer \"{text}\" is not one of the options")));
                }
            }
            (QuestionKind::MultiSelect, answer) => {
                for item in answer.as_list().unwrap_or_default() {
                    if !q.options.contains(item) {
                        warnings.push(warn(format!("answer \"{item}\" is not one of the options")));
                    }
                }
            }
            (QuestionKind::Ordering, answer) => {
                let mut expected = answer.as_list().unwrap_or_default().to_vec();
                let mut options = q.options.clone();
                expected.sort();
                options.sort();
                if expected != options {
                    warnings.push(warn("ordering answer is not a permutation of the options".into()));
                }
            }
            (QuestionKind::FillIn, answer) => {
                if answer.as_text().trim().is_empty() {
                    warnings.push(warn("fill-in answer is empty".into()));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"[
        {
            "Question": "What is 2 + 2?",
            "Options": ["3", "4", "5"],
            "answer": "4",
            "Rationale": "Two plus two is four.",
            "hint": "Count on your fingers."
        },
        {
            "Question": "Select the even numbers",
            "Options": ["1", "2", "3", "4"],
            "answer": ["2", "4"]
        },
        {
            "Question": "What is 10 / 4?",
            "answer": 2.5
        },
        {
            "Question": "Order from smallest",
            "Options": ["3", "1", "2"],
            "answer": ["1", "2", "3"],
            "type": "ordering"
        }
    ]"#;

    #[test]
    fn parse_valid_file() {
        let parsed = parse_questions_str(VALID_JSON, "math_grade3_basics.json").unwrap();
        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.questions.len(), 4);

        let q = &parsed.questions[0];
        assert_eq!(q.id, "math_grade3_basics.json_0");
        assert_eq!(q.kind, QuestionKind::Single);
        assert_eq!(q.answer, Answer::Single("4".into()));
        assert_eq!(q.rationale, "Two plus two is four.");
        assert_eq!(q.hint, "Count on your fingers.");
        assert_eq!(q.source.subject, "math");
        assert_eq!(q.source.grade_level, "3");

        assert_eq!(parsed.questions[1].kind, QuestionKind::MultiSelect);
        assert_eq!(parsed.questions[2].kind, QuestionKind::FillIn);
        assert_eq!(parsed.questions[2].answer, Answer::FillIn("2.5".into()));
        assert_eq!(parsed.questions[2].rationale, DEFAULT_RATIONALE);
        assert_eq!(parsed.questions[3].kind, QuestionKind::Ordering);
        assert_eq!(
            parsed.questions[3].answer,
            Answer::Ordering(vec!["1".into(), "2".into(), "3".into()])
        );
    }

    #[test]
    fn single_object_file() {
        let json = r#"{"Question": "Capital of France?", "answer": "Paris"}"#;
        let parsed = parse_questions_str(json, "geo.json").unwrap();
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].kind, QuestionKind::FillIn);
    }

    #[test]
    fn invalid_items_are_skipped() {
        let json = r#"[
            {"Options": ["a"], "answer": "a"},
            {"Question": "No answer", "Options": ["a"]},
            {"Question": "Null answer", "answer": null},
            {"Question": "Needs options", "answer": "a", "type": "single"},
            {"Question": "Empty options", "Options": [], "answer": ["a"]},
            {"Question": "Weird type", "answer": "a", "type": "essay"},
            "not an object",
            {"Question": "Fine", "answer": "ok"}
        ]"#;
        let parsed = parse_questions_str(json, "mixed.json").unwrap();
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].id, "mixed.json_7");
        let skipped: Vec<usize> = parsed.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(parsed.skipped[3].reason.contains("Options"));
        assert!(parsed.skipped[5].reason.contains("unknown question type"));
        assert!(parsed.skipped[6].reason.starts_with("malformed item"));
    }

    #[test]
    fn scalar_text_fields_are_stringified() {
        let json = r#"[
            {"Question": 7, "answer": "7", "Rationale": 1.5, "hint": true},
            {"Question": 0, "answer": "0"},
            {"Question": false, "answer": "x"},
            {"Question": "Bad options", "Options": "a,b", "answer": "a"}
        ]"#;
        let parsed = parse_questions_str(json, "scalars.json").unwrap();
        assert_eq!(parsed.questions.len(), 1);
        let q = &parsed.questions[0];
        assert_eq!(q.prompt, "7");
        assert_eq!(q.rationale, "1.5");
        assert_eq!(q.hint, "true");

        assert!(parsed.skipped[0].reason.contains("missing \"Question\""));
        assert!(parsed.skipped[1].reason.contains("missing \"Question\""));
        assert!(parsed.skipped[2].reason.contains("malformed item: invalid type"));
    }

    #[test]
    fn explicit_type_reshapes_answer() {
        let json = r#"[
            {"Question": "q", "Options": ["a", "b"], "answer": "a", "type": "multi-select"},
            {"Question": "q", "Options": ["a", "b"], "answer": ["a"], "type": "single"},
            {"Question": "q", "answer": 7, "type": "fill-in"}
        ]"#;
        let parsed = parse_questions_str(json, "t.json").unwrap();
        assert_eq!(parsed.questions[0].answer, Answer::MultiSelect(vec!["a".into()]));
        assert_eq!(parsed.questions[1].answer, Answer::Single("a".into()));
        assert_eq!(parsed.questions[2].answer, Answer::FillIn("7".into()));
    }

    #[test]
    fn question_converts_back_to_raw_item() {
        let parsed = parse_questions_str(VALID_JSON, "a.json").unwrap();
        let raw = serde_json::to_value(RawQuestion::from(&parsed.questions[1])).unwrap();
        assert_eq!(raw["Question"], "Select the even numbers");
        assert_eq!(raw["Options"], serde_json::json!(["1", "2", "3", "4"]));
        assert_eq!(raw["answer"], serde_json::json!(["2", "4"]));
        assert_eq!(raw["type"], "multi-select");
        assert!(raw["hint"].is_null());

        let raw = serde_json::to_value(RawQuestion::from(&parsed.questions[2])).unwrap();
        assert_eq!(raw["answer"], "2.5");
        assert!(raw["Options"].is_null());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result = parse_questions_str("[{ not json", "bad.json");
        assert!(result.is_err());
    }

    #[test]
    fn filename_with_grade() {
        let meta = parse_filename("math_grade5_fractions_intro.json");
        assert_eq!(meta.subject, "math");
        assert_eq!(meta.grade_level, "5");
        assert_eq!(meta.identifier, "fractions_intro");
        assert_eq!(meta.file, "math_grade5_fractions_intro.json");
    }

    #[test]
    fn filename_without_grade() {
        let meta = parse_filename("science_planets.json");
        assert_eq!(meta.subject, "science");
        assert_eq!(meta.grade_level, UNKNOWN);
        assert_eq!(meta.identifier, "planets");
    }

    #[test]
    fn filename_defaults() {
        let meta = parse_filename("history.json");
        assert_eq!(meta.subject, "history");
        assert_eq!(meta.grade_level, UNKNOWN);
        assert_eq!(meta.identifier, UNKNOWN);

        let meta = parse_filename("_grade2_.json");
        assert_eq!(meta.subject, GENERAL_SUBJECT);
        assert_eq!(meta.grade_level, "2");
        assert_eq!(meta.identifier, UNKNOWN);

        // "gradeX" without a number is not a grade marker.
        let meta = parse_filename("art_gradeX_colors.json");
        assert_eq!(meta.grade_level, UNKNOWN);
        assert_eq!(meta.identifier, "gradeX_colors");
    }

    #[test]
    fn validate_catches_problems() {
        let json = r#"[
            {"Question": "q1", "Options": ["a", "b"], "answer": "c"},
            {"Question": "q2", "Options": ["a", "b"], "answer": ["a", "z"]},
            {"Question": "q3", "Options": ["a", "b", "c"], "answer": ["a", "b"], "type": "ordering"},
            {"Question": "  ", "answer": "x"}
        ]"#;
        let parsed = parse_questions_str(json, "v.json").unwrap();
        let warnings = validate_questions(&parsed.questions);
        assert!(warnings.iter().any(|w| w.message.contains("\"c\" is not one of")));
        assert!(warnings.iter().any(|w| w.message.contains("\"z\" is not one of")));
        assert!(warnings.iter().any(|w| w.message.contains("permutation")));
        assert!(warnings.iter().any(|w| w.message.contains("prompt is empty")));
    }

    #[test]
    fn validate_duplicate_ids() {
        let parsed = parse_questions_str(VALID_JSON, "a.json").unwrap();
        let mut questions = parsed.questions.clone();
        questions.push(parsed.questions[0].clone());
        let warnings = validate_questions(&questions);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_clean_file() {
        let parsed = parse_questions_str(VALID_JSON, "a.json").unwrap();
        assert!(validate_questions(&parsed.questions).is_empty());
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("math_grade3_add.json"), VALID_JSON).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested/geo.json"),
            r#"{"Question": "Capital of France?", "answer": "Paris"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let files = load_question_directory(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        let total: usize = files.iter().map(|f| f.questions.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn load_path_rejects_missing_file() {
        assert!(load_path(Path::new("definitely/not/here.json")).is_err());
    }
}
