//! Homework bot - review status notifier
//!
//! Polls the Practicum homework-status API, detects review status changes,
//! and relays them to a Telegram chat.

pub mod config;
pub mod error;
pub mod homework;
pub mod io;
pub mod notifier;
pub mod poller;
pub mod practicum;
pub mod telegram;

pub use config::{load_config, Config, Settings};
pub use error::{BotError, Result};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::notifier::Notifier;
use crate::poller::{current_epoch_seconds, Poller};
use crate::practicum::PracticumClient;
use crate::telegram::TelegramNotifier;

/// Run the homework bot with validated settings until Ctrl-C
pub async fn run(settings: Settings) -> Result<()> {
    let http: Arc<dyn io::HttpClient> =
        Arc::new(ReqwestHttpClient::with_timeout(settings.request_timeout)?);
    let cancel = CancellationToken::new();

    let client = PracticumClient::new(&settings, Arc::clone(&http));
    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(&settings, Arc::clone(&http)));

    let mut poller = Poller::new(
        client,
        notifier,
        settings.retry_period,
        current_epoch_seconds(),
        cancel.clone(),
    );

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => {
                tracing::error!("Failed to listen for ctrl-c: {}", e);
                return;
            }
        }
        cancel_for_signal.cancel();
    });

    tracing::info!(
        "Homework bot started, polling every {}s",
        settings.retry_period.as_secs()
    );

    poller.run().await;

    tracing::info!("Homework bot stopped");
    Ok(())
}
