//! Practicum homework-status API client

use std::sync::Arc;

use serde_json::Value;

use crate::config::Settings;
use crate::io::HttpClient;
use crate::{BotError, Result};

const MAX_DETAIL_CHARS: usize = 200;

/// Client for the homework-status endpoint
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(settings: &Settings, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", settings.endpoint);

        Self {
            endpoint: settings.endpoint.clone(),
            authorization: format!("OAuth {}", settings.practicum_token),
            http,
        }
    }

    /// Request homework statuses changed since `timestamp`
    pub async fn get_api_answer(&self, timestamp: i64) -> Result<Value> {
        let from_date = timestamp.to_string();
        tracing::debug!("Requesting homework statuses from_date={}", from_date);

        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await
            .map_err(|e| BotError::Connection {
                endpoint: self.endpoint.clone(),
                from_date: timestamp,
                cause: match e {
                    BotError::Http(cause) => cause,
                    other => other.to_string(),
                },
            })?;

        if !response.is_success() {
            return Err(BotError::Api {
                endpoint: self.endpoint.clone(),
                from_date: timestamp,
                status: response.status,
                detail: truncate(&response.body),
            });
        }

        let body: Value = serde_json::from_str(&response.body)?;

        if let Some(indicator) = error_indicator(&body) {
            return Err(BotError::Api {
                endpoint: self.endpoint.clone(),
                from_date: timestamp,
                status: response.status,
                detail: indicator,
            });
        }

        Ok(body)
    }
}

/// `code` / `error` keys the API uses to signal a failed request inside a 2xx body
fn error_indicator(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    let parts: Vec<String> = ["code", "error"]
        .into_iter()
        .filter_map(|key| object.get(key).map(|v| format!("{}={}", key, v)))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn truncate(body: &str) -> String {
    if body.chars().count() <= MAX_DETAIL_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{}...", head)
    }
}
