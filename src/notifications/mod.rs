//! Notification delivery
//!
//! The tracker renders text with [`formatters`] and hands it to a
//! [`Notifier`]. Delivery is best-effort: failures are logged by
//! [`dispatch`] and never retried here.

pub mod formatters;
pub mod price;
#[cfg(feature = "telegram")]
pub mod telegram;

pub use formatters::{html_escape, render_activity, render_channel_error, render_wallet_list};
pub use price::{FixedPriceOracle, PriceOracle};
#[cfg(feature = "telegram")]
pub use telegram::TelegramNotifier;

use crate::logger::{self, LogTag};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Chat a wallet's notifications go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Destination(pub i64);

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver HTML-formatted text to a destination
    async fn notify(&self, destination: Destination, text: &str) -> Result<(), String>;
}

/// Send and log the outcome; returns whether delivery succeeded
pub async fn dispatch(notifier: &dyn Notifier, destination: Destination, text: &str) -> bool {
    match notifier.notify(destination, text).await {
        Ok(()) => {
            logger::debug(
                LogTag::Notifier,
                &format!("Delivered notification to {} (length={})", destination, text.len()),
            );
            true
        }
        Err(e) => {
            logger::warning(
                LogTag::Notifier,
                &format!("Notification to {} failed: {}", destination, e),
            );
            false
        }
    }
}

/// Writes notifications to the log; used when Telegram is disabled
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, destination: Destination, text: &str) -> Result<(), String> {
        logger::info(
            LogTag::Notifier,
            &format!("[chat {}]\n{}", destination, text),
        );
        Ok(())
    }
}
