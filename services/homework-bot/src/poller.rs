//! Poll loop: request, validate, translate, notify, sleep

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;

use crate::homework::{check_response, current_date, homeworks, parse_status};
use crate::notifier::Notifier;
use crate::practicum::PracticumClient;

const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// State carried from one poll cycle to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Lower bound for the next request, unix seconds
    pub timestamp: i64,
    /// Last failure message relayed to the chat
    pub last_error_message: Option<String>,
}

/// What a single cycle did, for logging and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response carried no homework changes
    NoChanges,
    /// A status change was relayed
    Notified(String),
    /// The cycle failed; `relayed` is false when the message repeated the previous one
    Failed { message: String, relayed: bool },
}

/// Drives the poll cycle on a fixed interval
#[derive(Debug)]
pub struct Poller {
    client: PracticumClient,
    notifier: Arc<dyn Notifier>,
    retry_period: Duration,
    state: PollState,
    cancel: CancellationToken,
}

impl Poller {
    pub fn new(
        client: PracticumClient,
        notifier: Arc<dyn Notifier>,
        retry_period: Duration,
        initial_timestamp: i64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            notifier,
            retry_period,
            state: PollState {
                timestamp: initial_timestamp,
                last_error_message: None,
            },
            cancel,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Poll until the cancellation token is triggered
    pub async fn run(&mut self) {
        loop {
            let outcome = self.poll_once().await;
            tracing::debug!("Poll cycle finished: {:?}", outcome);

            tokio::select! {
                _ = tokio::time::sleep(self.retry_period) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }

    /// Run one request-validate-notify cycle and fold any failure into the
    /// duplicate-suppressed error path
    pub async fn poll_once(&mut self) -> CycleOutcome {
        match self.check_for_updates().await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = format!("{}: {}", FAILURE_PREFIX, e);
                tracing::error!("{}", message);

                if self.state.last_error_message.as_deref() == Some(message.as_str()) {
                    tracing::debug!("Same failure as last cycle, not relaying");
                    return CycleOutcome::Failed {
                        message,
                        relayed: false,
                    };
                }

                self.send_message(&message).await;
                self.state.last_error_message = Some(message.clone());
                CycleOutcome::Failed {
                    message,
                    relayed: true,
                }
            }
        }
    }

    async fn check_for_updates(&mut self) -> crate::Result<CycleOutcome> {
        let response = self.client.get_api_answer(self.state.timestamp).await?;
        check_response(&response)?;

        let Some(latest) = homeworks(&response).first() else {
            tracing::debug!("No homework status changes");
            return Ok(CycleOutcome::NoChanges);
        };

        let message = parse_status(latest)?;
        self.send_message(&message).await;

        match current_date(&response) {
            Some(date) if date > self.state.timestamp => self.state.timestamp = date,
            Some(date) => tracing::debug!(
                "Ignoring current_date {} not after {}",
                date,
                self.state.timestamp
            ),
            None => tracing::debug!("Response has no current_date, keeping timestamp"),
        }
        self.state.last_error_message = None;

        Ok(CycleOutcome::Notified(message))
    }

    /// Deliver a message, logging (not propagating) delivery failures
    async fn send_message(&self, text: &str) {
        match self.notifier.send_message(text).await {
            Ok(()) => tracing::debug!("Message delivered via {}", self.notifier.type_name()),
            Err(e) => tracing::error!(
                "Failed to deliver message via {}: {}",
                self.notifier.type_name(),
                e
            ),
        }
    }
}

/// Current unix time in seconds
pub fn current_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
