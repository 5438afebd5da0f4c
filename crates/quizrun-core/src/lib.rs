//! quizrun-core: Test session engine, grading and question banks.
//!
//! This crate holds the question model, the session state machine, answer
//! evaluation and scoring, plus the question bank and progress tracking
//! that the rest of quizrun builds on.

pub mod bank;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod progress;
pub mod report;
pub mod results;
pub mod selector;
pub mod session;
pub mod store;
pub mod traits;
