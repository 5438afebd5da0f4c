pub mod bank;
pub mod import;
pub mod init;
pub mod progress;
pub mod take;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizrun_core::engine::QuizApp;
use quizrun_core::store::FileStore;
use quizrun_remote::config::{load_config_from, QuizrunConfig};

/// Load config and open the app on the persistent store it names.
pub fn open_app(config_path: Option<&Path>) -> Result<(QuizrunConfig, QuizApp)> {
    let config = load_config_from(config_path)?;
    let store = FileStore::open(config.store_path())
        .with_context(|| format!("failed to open data in {}", config.data_dir.display()))?;
    let app = QuizApp::open(Arc::new(store), config.session_config())?;
    Ok((config, app))
}
