//! Chat message handlers

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppData, WebAppInfo};
use url::Url;

use super::{Command, HandlerError, HandlerResult, intake, texts};
use crate::core::ServerState;
use crate::services::order_intake::ChatIdentity;

pub async fn on_command(bot: Bot, msg: Message, cmd: Command, state: ServerState) -> HandlerResult {
    match cmd {
        Command::Start => start(bot, msg, state).await,
    }
}

async fn start(bot: Bot, msg: Message, state: ServerState) -> HandlerResult {
    let title = &state.config.store_title;
    let target = state
        .config
        .webapp_url
        .as_deref()
        .unwrap_or(texts::FALLBACK_WEBAPP_URL);
    let url = Url::parse(target)?;

    let keyboard = InlineKeyboardMarkup::new([[InlineKeyboardButton::web_app(
        texts::open_button(title),
        WebAppInfo { url },
    )]]);

    bot.send_message(msg.chat.id, texts::greeting(title))
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Cart submitted from the embedded web view
pub async fn on_web_app_data(
    bot: Bot,
    msg: Message,
    payload: WebAppData,
    state: ServerState,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let chat = msg.from.as_ref().map(|user| ChatIdentity {
        user_id: user.id.0 as i64,
        username: user.username.clone(),
    });

    intake::process_web_app_order(&state, &payload.data, chat, move |text| async move {
        bot.send_message(chat_id, text).await?;
        Ok::<(), HandlerError>(())
    })
    .await
}
