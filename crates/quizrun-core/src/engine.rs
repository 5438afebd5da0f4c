//! Application context.
//!
//! [`QuizApp`] owns every piece of state a front-end works with: the saved
//! question bank, the running test session, the star/badge progress and the
//! store they persist to. Front-ends drive it and render from its getters.

use std::sync::Arc;

use anyhow::Result;

use crate::bank::{QuestionBank, QuestionFilter};
use crate::error::SessionError;
use crate::model::{Answer, Question};
use crate::progress::{Badge, Progress};
use crate::results::SessionResult;
use crate::selector::select;
use crate::session::{SessionConfig, TestSession};
use crate::store::KeyValueStore;
use crate::traits::{NoopObserver, SessionObserver};

/// Stars awarded per correct answer.
pub const STARS_PER_CORRECT: u32 = 1;

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub correct: bool,
    /// Badges unlocked by the stars this answer earned.
    pub new_badges: Vec<Badge>,
    /// True if this answer completed the test.
    pub finished: bool,
}

/// The application context.
pub struct QuizApp {
    bank: QuestionBank,
    session: TestSession,
    progress: Progress,
    store: Arc<dyn KeyValueStore>,
    observer: Arc<dyn SessionObserver>,
    config: SessionConfig,
}

impl QuizApp {
    /// Load bank and progress from `store`.
    pub fn open(store: Arc<dyn KeyValueStore>, config: SessionConfig) -> Result<Self> {
        let bank = QuestionBank::load(store.as_ref())?;
        let progress = Progress::load(store.as_ref())?;
        Ok(Self {
            bank,
            session: TestSession::new(config),
            progress,
            store,
            observer: Arc::new(NoopObserver),
            config,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn session(&self) -> &TestSession {
        &self.session
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    // -- question bank --------------------------------------------------------

    /// Add questions to the bank and persist it. Returns how many were new.
    pub fn import(&mut self, questions: Vec<Question>) -> Result<usize> {
        let added = self.bank.add_questions(questions);
        if added > 0 {
            self.bank.save(self.store.as_ref())?;
        }
        tracing::info!("imported {added} new questions ({} total)", self.bank.len());
        Ok(added)
    }

    /// Remove every saved question.
    pub fn delete_questions(&mut self) -> Result<()> {
        self.bank.clear();
        self.bank.save(self.store.as_ref())?;
        tracing::info!("question bank cleared");
        Ok(())
    }

    // -- test lifecycle -------------------------------------------------------

    /// Start a test of `length` questions drawn from the bank.
    pub fn start_test(&mut self, filter: &QuestionFilter, length: usize) -> Result<(), SessionError> {
        let pool = self.bank.filter(filter);
        self.start_with_pool(&pool, length)
    }

    /// Start a test of `length` questions drawn from `pool`.
    ///
    /// Any previous session is discarded first.
    pub fn start_with_pool(&mut self, pool: &[Question], length: usize) -> Result<(), SessionError> {
        let sequence = select(pool, length)?;
        self.session = TestSession::new(self.config);
        self.session.start(sequence)?;
        self.observer.on_test_started(self.session.len());
        Ok(())
    }

    /// Submit an answer for the current question.
    ///
    /// Correct answers earn stars, which are persisted immediately. A failed
    /// save is logged rather than failing the submission, since the answer is
    /// already recorded.
    pub fn submit(&mut self, answer: Answer) -> Result<SubmitOutcome, SessionError> {
        let correct = self.session.submit(answer)?;

        let index = self.session.cursor();
        if let Some(record) = self.session.record_at(index) {
            self.observer.on_answer_recorded(index, record);
        }

        let mut new_badges = Vec::new();
        if correct {
            new_badges = self.progress.add_stars(STARS_PER_CORRECT);
            if let Err(e) = self.progress.save(self.store.as_ref()) {
                tracing::error!("failed to save progress: {e:#}");
            }
            for badge in &new_badges {
                self.observer
                    .on_badge_unlocked(*badge, self.progress.stars());
            }
        }

        let finished = self.session.is_finished();
        if finished {
            self.observer.on_test_finished(&self.session.summarize());
        }

        Ok(SubmitOutcome {
            correct,
            new_badges,
            finished,
        })
    }

    pub fn advance(&mut self) -> Option<&Question> {
        self.session.advance()
    }

    pub fn retreat(&mut self) -> Option<&Question> {
        self.session.retreat()
    }

    pub fn current(&self) -> Option<&Question> {
        self.session.current()
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    pub fn results(&self) -> SessionResult {
        self.session.summarize()
    }

    /// Abandon the current test.
    pub fn new_test(&mut self) {
        self.session.reset();
    }

    // -- progress -------------------------------------------------------------

    /// Zero the star count, drop all badges and persist.
    pub fn reset_progress(&mut self) -> Result<()> {
        self.progress.reset();
        self.progress.save(self.store.as_ref())?;
        tracing::info!("progress reset");
        Ok(())
    }
}
