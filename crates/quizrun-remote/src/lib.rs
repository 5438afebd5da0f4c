//! quizrun-remote: Quiz service client and configuration.
//!
//! Implements the `QuizBackend` trait over HTTP, provides a mock backend for
//! tests, and loads the `quizrun.toml` configuration.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{create_backend, load_config, load_config_from, ApiConfig, QuizrunConfig};
pub use error::RemoteError;
pub use http::HttpBackend;
pub use mock::MockBackend;
