//! Telegram delivery through the Bot API (teloxide)

use super::{Destination, Notifier};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    /// # Arguments
    /// * `bot_token` - Telegram bot token from @BotFather
    pub fn new(bot_token: &str) -> Result<Self, String> {
        if bot_token.trim().is_empty() {
            return Err("Bot token is empty".to_string());
        }
        Ok(Self {
            bot: Bot::new(bot_token),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, destination: Destination, text: &str) -> Result<(), String> {
        self.bot
            .send_message(ChatId(destination.0), text)
            .parse_mode(ParseMode::Html)
            .disable_web_page_preview(true)
            .send()
            .await
            .map_err(|e| format!("Failed to send Telegram message: {}", e))?;
        Ok(())
    }
}
