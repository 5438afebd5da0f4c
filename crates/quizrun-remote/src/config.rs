//! Configuration loading and backend factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizrun_core::session::SessionConfig;
use quizrun_core::traits::QuizBackend;

use crate::http::{HttpBackend, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// File name of the key-value store inside `data_dir`.
pub const STORE_FILE: &str = "store.json";

/// Where the quiz service lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Top-level quizrun configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizrunConfig {
    #[serde(default)]
    pub api: ApiConfig,
    /// Questions per test when `--length` is not given.
    #[serde(default = "default_test_length")]
    pub default_test_length: usize,
    /// Name reported to the quiz service.
    #[serde(default = "default_player")]
    pub player_name: String,
    /// Directory holding the saved bank and progress.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Count an empty multi-select or ordering answer as given.
    #[serde(default = "default_true")]
    pub accept_empty_selection: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_test_length() -> usize {
    10
}
fn default_player() -> String {
    "Player".to_string()
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./quizrun-data")
}
fn default_true() -> bool {
    true
}

impl Default for QuizrunConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            default_test_length: default_test_length(),
            player_name: default_player(),
            data_dir: default_data_dir(),
            accept_empty_selection: true,
        }
    }
}

impl QuizrunConfig {
    /// Path of the persistent store file.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            accept_empty_selection: self.accept_empty_selection,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        // Substituted values are not scanned again.
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizrun.toml` in the current directory
/// 2. `~/.config/quizrun/config.toml`
///
/// Environment variable overrides: `QUIZRUN_API_URL`, `QUIZRUN_PLAYER`,
/// `QUIZRUN_DATA_DIR`.
pub fn load_config() -> Result<QuizrunConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizrunConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizrun.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizrunConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizrunConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Apply `QUIZRUN_*` overrides from `lookup`, then expand `${VAR}` references.
fn apply_overrides(config: &mut QuizrunConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("QUIZRUN_API_URL") {
        config.api.base_url = url;
    }
    if let Some(player) = lookup("QUIZRUN_PLAYER") {
        config.player_name = player;
    }
    if let Some(dir) = lookup("QUIZRUN_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    config.api.base_url = resolve_env_vars(&config.api.base_url);
    config.player_name = resolve_env_vars(&config.player_name);
    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrun"))
}

/// Create the quiz service client described by `config`.
pub fn create_backend(config: &ApiConfig) -> Result<Box<dyn QuizBackend>> {
    let backend = HttpBackend::new(Some(config.base_url.clone()), config.timeout_secs)
        .context("failed to create quiz service client")?;
    Ok(Box::new(backend))
}
