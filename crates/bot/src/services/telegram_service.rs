use async_trait::async_trait;
use teloxide::prelude::*;
use tracing::debug;

use common::{DeliveryError, Destination, ReportSink};

/// Delivers rendered reports as plain Telegram messages.
#[derive(Clone)]
pub struct TelegramService {
    bot: Bot,
}

impl TelegramService {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReportSink for TelegramService {
    async fn deliver(&self, destination: Destination, text: &str) -> Result<(), DeliveryError> {
        // Send and report the error, the caller decides whether it matters.
        self.bot
            .send_message(ChatId(destination.0), text)
            .await
            .map_err(|e| DeliveryError::Unreachable {
                destination,
                reason: e.to_string(),
            })?;

        debug!("Delivered {} bytes to chat {}", text.len(), destination);
        Ok(())
    }
}
