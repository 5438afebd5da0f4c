//! The saved question bank and its filters.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::store::{KeyValueStore, KEY_QUESTIONS};

/// Narrow a bank to one subject, grade level and/or identifier.
///
/// `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionFilter {
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub identifier: Option<String>,
}

impl QuestionFilter {
    pub fn matches(&self, question: &Question) -> bool {
        fn field_matches(wanted: &Option<String>, actual: &str) -> bool {
            wanted.as_deref().map_or(true, |w| w == actual)
        }
        field_matches(&self.subject, &question.source.subject)
            && field_matches(&self.grade_level, &question.source.grade_level)
            && field_matches(&self.identifier, &question.source.identifier)
    }
}

/// Distinct filter values present in a bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterLists {
    pub subjects: BTreeSet<String>,
    pub grade_levels: BTreeSet<String>,
    pub identifiers: BTreeSet<String>,
}

/// All questions the user has imported.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add questions, skipping any whose ID is already present.
    ///
    /// Returns how many were added.
    pub fn add_questions(&mut self, questions: impl IntoIterator<Item = Question>) -> usize {
        let mut ids: HashSet<String> = self.questions.iter().map(|q| q.id.clone()).collect();
        let before = self.questions.len();
        for q in questions {
            if ids.insert(q.id.clone()) {
                self.questions.push(q);
            }
        }
        self.questions.len() - before
    }

    pub fn clear(&mut self) {
        self.questions.clear();
    }

    /// Questions matching `filter`, in bank order.
    pub fn filter(&self, filter: &QuestionFilter) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect()
    }

    pub fn filter_lists(&self) -> FilterLists {
        let mut lists = FilterLists::default();
        for q in &self.questions {
            lists.subjects.insert(q.source.subject.clone());
            lists.grade_levels.insert(q.source.grade_level.clone());
            lists.identifiers.insert(q.source.identifier.clone());
        }
        lists
    }

    /// Question counts per subject.
    pub fn subject_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for q in &self.questions {
            *counts.entry(q.source.subject.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Load the bank saved in `store`.
    ///
    /// Unparseable saved data is discarded (and removed from the store) so a
    /// bad write cannot lock the user out.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let Some(saved) = store.get(KEY_QUESTIONS)? else {
            return Ok(Self::new());
        };

        match serde_json::from_str::<Vec<Question>>(&saved) {
            Ok(questions) => {
                tracing::info!("loaded {} questions from storage", questions.len());
                Ok(Self { questions })
            }
            Err(e) => {
                tracing::warn!("error parsing saved questions, clearing saved data: {e}");
                store.remove(KEY_QUESTIONS)?;
                Ok(Self::new())
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.questions).context("failed to serialize questions")?;
        store.set(KEY_QUESTIONS, &json)?;
        tracing::debug!("saved {} questions", self.questions.len());
        Ok(())
    }
}
