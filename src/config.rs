//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ConfigError;
use crate::history::CliHistory;
use crate::llm::{HttpChatBackend, Provider};

/// Selects the provider (`openai` or `groq`).
pub const CLIENT_TYPE_VAR: &str = "CLIENT_TYPE";

/// Overrides the provider's default model.
pub const MODEL_VAR: &str = "GITGPT_MODEL";

/// Overrides the changelog path.
pub const CHANGELOG_VAR: &str = "GITGPT_CHANGELOG";

/// Overrides the CLI-help history file path.
pub const HISTORY_FILE_VAR: &str = "GITGPT_HISTORY_FILE";

const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";
const SHELL_HISTORY_FILE: &str = ".zsh_history";

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub changelog_path: PathBuf,
    pub history_path: Option<PathBuf>,
    pub shell_history_path: Option<PathBuf>,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Build the configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match non_empty_var(CLIENT_TYPE_VAR) {
            Some(value) => value.parse::<Provider>()?,
            None => Provider::default(),
        };

        let model =
            non_empty_var(MODEL_VAR).unwrap_or_else(|| provider.default_model().to_string());
        let base_url = non_empty_var(provider.base_url_var())
            .unwrap_or_else(|| provider.default_base_url().to_string());

        let config = Self {
            provider,
            api_key: non_empty_var(provider.api_key_var()),
            base_url,
            model,
            changelog_path: non_empty_var(CHANGELOG_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG)),
            history_path: non_empty_var(HISTORY_FILE_VAR)
                .map(PathBuf::from)
                .or_else(CliHistory::default_path),
            shell_history_path: dirs::home_dir().map(|home| home.join(SHELL_HISTORY_FILE)),
        };

        debug!(
            "Using {} with model {} at {}",
            config.provider, config.model, config.base_url
        );

        Ok(config)
    }

    /// HTTP backend for the configured provider.
    pub fn backend(&self) -> HttpChatBackend {
        HttpChatBackend::new(self.provider, self.base_url.clone(), self.api_key.clone())
    }
}
