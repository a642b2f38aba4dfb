//! Configuration types for the homework bot

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub practicum_token: Option<String>,
    #[serde(default)]
    pub telegram_token: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    #[serde(default = "default_retry_period")]
    pub retry_period_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            practicum_token: None,
            telegram_token: None,
            telegram_chat_id: None,
            endpoint: default_endpoint(),
            telegram_api_url: default_telegram_api_url(),
            retry_period_seconds: default_retry_period(),
            request_timeout_seconds: default_request_timeout(),
            log_file: default_log_file(),
        }
    }
}

/// Validated configuration with every secret present
#[derive(Clone)]
pub struct Settings {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub retry_period: Duration,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period", &self.retry_period)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    /// Fill secrets from the process environment
    pub fn resolve_secrets(&mut self) {
        self.resolve_secrets_with(|name| std::env::var(name).ok());
    }

    /// Fill secrets using the given lookup. A non-empty looked-up value
    /// overrides whatever the config file supplied.
    pub fn resolve_secrets_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields = [
            (PRACTICUM_TOKEN_VAR, &mut self.practicum_token),
            (TELEGRAM_TOKEN_VAR, &mut self.telegram_token),
            (TELEGRAM_CHAT_ID_VAR, &mut self.telegram_chat_id),
        ];
        for (name, slot) in fields {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                tracing::debug!("Using {} from environment", name);
                *slot = Some(value);
            }
        }
    }

    /// Names of required variables that are absent or empty
    pub fn missing_secrets(&self) -> Vec<String> {
        [
            (PRACTICUM_TOKEN_VAR, &self.practicum_token),
            (TELEGRAM_TOKEN_VAR, &self.telegram_token),
            (TELEGRAM_CHAT_ID_VAR, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name.to_string())
        .collect()
    }

    /// Turn the raw configuration into [`Settings`], failing if any secret is missing
    pub fn validate(&self) -> crate::Result<Settings> {
        let missing = self.missing_secrets();
        if !missing.is_empty() {
            return Err(crate::BotError::MissingConfig(missing));
        }
        if self.retry_period_seconds == 0 {
            return Err(crate::BotError::Config(
                "retry_period_seconds must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(crate::BotError::Config(
                "request_timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(Settings {
            practicum_token: self.practicum_token.clone().unwrap_or_default(),
            telegram_token: self.telegram_token.clone().unwrap_or_default(),
            telegram_chat_id: self.telegram_chat_id.clone().unwrap_or_default(),
            endpoint: self.endpoint.clone(),
            telegram_api_url: self.telegram_api_url.trim_end_matches('/').to_string(),
            retry_period: Duration::from_secs(self.retry_period_seconds),
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
        })
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_file() -> PathBuf {
    PathBuf::from("homework_bot.log")
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::BotError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
