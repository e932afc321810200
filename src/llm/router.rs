//! Provider selection.
//!
//! Both providers speak the same streamed chat-completions shape, so the
//! switch only decides endpoint, credential and default model.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Supported chat-completion providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    OpenAi,
    Groq,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Groq => "Groq",
        }
    }

    /// Model used when `GITGPT_MODEL` is not set.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-5.2",
            Provider::Groq => "llama-3.1-70b-versatile",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
        }
    }

    /// Environment variable overriding the endpoint.
    pub fn base_url_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_BASE_URL",
            Provider::Groq => "GROQ_BASE_URL",
        }
    }

    /// Reasoning effort hint, only understood by OpenAI.
    pub fn reasoning_effort(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("low"),
            Provider::Groq => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            _ => Err(ConfigError::InvalidClientType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_provider_is_openai() {
        assert_eq!(Provider::default(), Provider::OpenAi);
    }

    #[test]
    fn parses_client_type_case_insensitively() {
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("Groq".parse::<Provider>().unwrap(), Provider::Groq);
    }

    #[test]
    fn rejects_unknown_client_type() {
        let err = "anthropic".parse::<Provider>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidClientType(ref v) if v == "anthropic"));
    }

    #[test]
    fn default_models_differ_per_provider() {
        assert_ne!(Provider::OpenAi.default_model(), Provider::Groq.default_model());
        assert_eq!(Provider::Groq.reasoning_effort(), None);
    }
}
