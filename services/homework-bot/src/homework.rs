//! Homework records: response shape checks and verdict translation

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::{BotError, Result};

/// Review outcome reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Raw status code as sent by the API
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        }
    }

    /// Human-readable verdict text
    pub fn text(&self) -> &'static str {
        match self {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Verdict {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self> {
        Verdict::ALL
            .into_iter()
            .find(|v| v.code() == s)
            .ok_or_else(|| BotError::UnknownStatus(s.to_string()))
    }
}

/// Check that a decoded API body has a `homeworks` list
pub fn check_response(response: &Value) -> Result<()> {
    let object = response.as_object().ok_or_else(|| {
        BotError::UnexpectedType(format!(
            "expected a JSON object, got {}",
            json_type_name(response)
        ))
    })?;

    let homeworks = object
        .get("homeworks")
        .ok_or_else(|| BotError::MissingKey("homeworks".to_string()))?;

    if !homeworks.is_array() {
        return Err(BotError::UnexpectedType(format!(
            "'homeworks' should be a list, got {}",
            json_type_name(homeworks)
        )));
    }

    Ok(())
}

/// Homework records of a response that already passed [`check_response`]
pub fn homeworks(response: &Value) -> &[Value] {
    response
        .get("homeworks")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Server time of the response, if it carries an integer `current_date`
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

/// Build the status-change message for a single homework record
pub fn parse_status(homework: &Value) -> Result<String> {
    let object = homework.as_object().ok_or_else(|| {
        BotError::UnexpectedType(format!(
            "homework should be an object, got {}",
            json_type_name(homework)
        ))
    })?;

    let name = object
        .get("homework_name")
        .ok_or_else(|| BotError::MissingKey("homework_name".to_string()))?;
    let name = name.as_str().ok_or_else(|| {
        BotError::UnexpectedType(format!(
            "'homework_name' should be a string, got {}",
            json_type_name(name)
        ))
    })?;

    let status = object
        .get("status")
        .ok_or_else(|| BotError::MissingKey("status".to_string()))?;
    let verdict: Verdict = match status.as_str() {
        Some(code) => code.parse()?,
        None => return Err(BotError::UnknownStatus(status.to_string())),
    };

    tracing::debug!("Homework '{}' has status {}", name, verdict);
    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        verdict.text()
    ))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
