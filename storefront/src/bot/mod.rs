//! Chat front door
//!
//! Two message branches:
//! - `/start` replies with a greeting and a button that opens the web view
//! - web-app data messages carry a cart; the order is placed exactly like
//!   `POST /api/order`, with the sender as the chat identity
//!
//! Handlers stay thin; the order flow lives in [`intake`] so it can run
//! without a bot connection.

mod handler;
pub mod intake;
pub mod texts;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::ServerState;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Open the storefront
    Start,
}

/// Update routing tree
pub fn schema() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handler::on_command),
        )
        .branch(
            dptree::filter_map(|msg: Message| msg.web_app_data().cloned())
                .endpoint(handler::on_web_app_data),
        )
}

/// Poll updates until Ctrl-C
pub async fn run(bot: Bot, state: ServerState) {
    tracing::info!("Chat dispatcher started");
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    tracing::info!("Chat dispatcher stopped");
}
