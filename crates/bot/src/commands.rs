use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, error};

use common::Destination;

use crate::services::CommandCenter;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "start automatic signal updates.")]
    Start,
    #[command(description = "stop automatic signal updates.")]
    Stop,
    #[command(description = "scan all pairs now.")]
    Signal,
    #[command(description = "display this text.")]
    Help,
}

pub async fn answer(
    bot: Bot,
    msg: Message,
    cmd: Command,
    center: Arc<CommandCenter>,
) -> ResponseResult<()> {
    let destination = Destination(msg.chat.id.0);
    debug!("Command {:?} from chat {}", cmd, destination);

    match cmd {
        Command::Start => {
            let reply = center.on_start(destination).await;
            bot.send_message(msg.chat.id, reply).await?;
        }
        Command::Stop => {
            let reply = center.on_stop().await;
            bot.send_message(msg.chat.id, reply).await?;
        }
        Command::Signal => {
            if let Err(e) = center.on_manual_scan(destination).await {
                error!("Manual scan for chat {} not delivered: {}", destination, e);
            }
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }

    Ok(())
}
