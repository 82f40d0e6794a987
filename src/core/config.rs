use std::env;

use anyhow::{Context, Result};

pub const DEFAULT_API_HOSTNAME: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0613";
pub const DEFAULT_SYSTEM_MESSAGE: &str = "Don't make assumptions about what values to plug into functions. Ask for clarification if a user request is ambiguous.";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub system_message: String,
    pub max_function_calls: Option<usize>,
}

impl AppConfig {
    /// Reads the configuration from environment variables.
    ///
    /// A missing API key is not an error here, requests are sent
    /// without credentials and rejected by the API instead.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_TOKEN")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|k| !k.is_empty());
        let openai_api_hostname =
            lookup("FUNCHAT_LLM_HOST").unwrap_or_else(|| DEFAULT_API_HOSTNAME.to_string());
        let openai_model =
            lookup("FUNCHAT_LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let system_message = lookup("FUNCHAT_SYSTEM_MESSAGE")
            .unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string());
        let max_function_calls = lookup("FUNCHAT_MAX_FUNCTION_CALLS")
            .map(|v| {
                v.trim()
                    .parse::<usize>()
                    .with_context(|| format!("Invalid FUNCHAT_MAX_FUNCTION_CALLS: {}", v))
            })
            .transpose()?;

        Ok(Self {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            system_message,
            max_function_calls,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_hostname: DEFAULT_API_HOSTNAME.to_string(),
            openai_api_key: None,
            openai_model: DEFAULT_MODEL.to_string(),
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            max_function_calls: None,
        }
    }
}
