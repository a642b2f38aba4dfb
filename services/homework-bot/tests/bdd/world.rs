//! BDD test world for the homework bot

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use cucumber::World;
use serde_json::Value;
use tokio::sync::RwLock;

use homework_bot::config::{Config, Settings};
use homework_bot::io::{HttpClient, HttpResponse};
use homework_bot::notifier::Notifier;
use homework_bot::poller::{CycleOutcome, Poller};
use homework_bot::BotError;

#[derive(Debug, Default, World)]
pub struct HomeworkBotWorld {
    // Translation and validation
    pub homework: Option<Value>,
    pub response_body: Option<Value>,
    pub translation: Option<homework_bot::Result<String>>,
    pub validation: Option<homework_bot::Result<()>>,

    // Configuration
    pub environment: HashMap<String, String>,
    pub config: Option<Config>,
    pub settings_result: Option<homework_bot::Result<Settings>>,

    // Notifier
    pub notifier: Option<Box<dyn Notifier>>,
    pub notifier_http: Option<Arc<FakeTelegramHttp>>,
    pub notification_result: Option<homework_bot::Result<()>>,

    // Poll loop
    pub api: Option<Arc<ScriptedApi>>,
    pub chat: Option<Arc<RecordingChat>>,
    pub poller: Option<Poller>,
    pub initial_timestamp: i64,
    pub outcomes: Vec<CycleOutcome>,
}

/// Settings with every secret filled in, pointing at local fakes
pub fn test_settings() -> Settings {
    Config {
        practicum_token: Some("p-token".to_string()),
        telegram_token: Some("123:abc".to_string()),
        telegram_chat_id: Some("42".to_string()),
        endpoint: "http://practicum.test/statuses/".to_string(),
        telegram_api_url: "http://telegram.test".to_string(),
        ..Config::default()
    }
    .validate()
    .expect("test settings should be valid")
}

/// What the scripted API should do for one request
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Body(u16, String),
    Unreachable(String),
}

/// Homework API fake that replays queued replies and records query strings.
/// Once the queue is drained it answers with an empty homework list.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    replies: RwLock<VecDeque<ScriptedReply>>,
    requests: RwLock<Vec<Vec<(String, String)>>>,
}

impl ScriptedApi {
    pub async fn push(&self, reply: ScriptedReply) {
        self.replies.write().await.push_back(reply);
    }

    pub async fn requests(&self) -> Vec<Vec<(String, String)>> {
        self.requests.read().await.clone()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedApi {
    async fn get(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        self.requests.write().await.push(
            query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );

        match self.replies.write().await.pop_front() {
            Some(ScriptedReply::Body(status, body)) => Ok(HttpResponse { status, body }),
            Some(ScriptedReply::Unreachable(cause)) => Err(BotError::Http(cause)),
            None => Ok(HttpResponse {
                status: 200,
                body: r#"{"homeworks": []}"#.to_string(),
            }),
        }
    }

    async fn post_json(&self, _url: &str, _body: &Value) -> homework_bot::Result<HttpResponse> {
        Err(BotError::Http("the homework API takes no posts".to_string()))
    }
}

/// Chat fake that records every message it is asked to deliver
#[derive(Debug, Default)]
pub struct RecordingChat {
    pub failing: bool,
    messages: RwLock<Vec<String>>,
}

impl RecordingChat {
    pub fn failing() -> Self {
        Self {
            failing: true,
            messages: RwLock::new(Vec::new()),
        }
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.read().await.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingChat {
    fn type_name(&self) -> &str {
        "recording"
    }

    async fn send_message(&self, text: &str) -> homework_bot::Result<()> {
        self.messages.write().await.push(text.to_string());
        if self.failing {
            Err(BotError::Delivery("chat unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Telegram transport fake with a fixed reply that records posted payloads
#[derive(Debug)]
pub struct FakeTelegramHttp {
    reply: Result<HttpResponse, String>,
    posts: RwLock<Vec<(String, Value)>>,
}

impl FakeTelegramHttp {
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            reply: Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
            posts: RwLock::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reply: Err("connection refused".to_string()),
            posts: RwLock::new(Vec::new()),
        }
    }

    pub async fn posts(&self) -> Vec<(String, Value)> {
        self.posts.read().await.clone()
    }
}

#[async_trait::async_trait]
impl HttpClient for FakeTelegramHttp {
    async fn get(
        &self,
        _url: &str,
        _headers: &[(&str, &str)],
        _query: &[(&str, &str)],
    ) -> homework_bot::Result<HttpResponse> {
        Err(BotError::Http("the Bot API fake takes no gets".to_string()))
    }

    async fn post_json(&self, url: &str, body: &Value) -> homework_bot::Result<HttpResponse> {
        self.posts
            .write()
            .await
            .push((url.to_string(), body.clone()));
        match &self.reply {
            Ok(response) => Ok(response.clone()),
            Err(cause) => Err(BotError::Http(cause.clone())),
        }
    }
}
