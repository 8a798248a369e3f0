use std::sync::Arc;

use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use common::ReportSink;
use common::config::Settings;
use common::logger;
use market_data::{BinanceClient, CandleSource};
use strategy::PairScanner;

use crate::commands::Command;
use crate::services::{AutoSignalScheduler, CommandCenter, TelegramService};

mod commands;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    info!("🚀 Starting Telegram Bot...");

    let settings = Settings::from_env()?;
    info!(
        "Screening {} pairs on {} candles, auto interval {:?}",
        settings.pairs.len(),
        settings.candle_interval,
        settings.scan_interval
    );

    let source: Arc<dyn CandleSource> = Arc::new(BinanceClient::new(&settings.binance_base_url)?);
    let scanner = Arc::new(
        PairScanner::new(source, &settings.pairs)
            .with_window(&settings.candle_interval, settings.candle_limit),
    );

    let bot = Bot::new(&settings.telegram_token);
    let sink: Arc<dyn ReportSink> = Arc::new(TelegramService::new(bot.clone()));
    let scheduler = Arc::new(AutoSignalScheduler::new(
        scanner.clone(),
        sink.clone(),
        settings.scan_interval,
    ));
    let center = Arc::new(CommandCenter::new(scheduler.clone(), scanner, sink));

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    info!("✅ Bot is running... Waiting for commands.");
    let handler = Update::filter_message()
        .filter_command::<Command>()
        .endpoint(commands::answer);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![center])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    if scheduler.is_running().await {
        scheduler.stop().await;
    }
    info!("Bot stopped.");
    Ok(())
}
