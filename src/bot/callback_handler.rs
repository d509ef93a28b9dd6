//! Callback Handler module for processing inline keyboard callback queries

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, warn};

use super::navigator::{self, NextScreen};
use super::screens;
use super::BotState;

/// Handle callback queries from the navigation keyboards.
///
/// The screen decision is computed against one catalog snapshot, and the
/// session is keyed by the pressing user, not by the author of the message
/// the button hangs off (which is the bot itself).
pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> Result<()> {
    let user_id = q.from.id;
    let first_name = q.from.first_name.clone();

    debug!(user_id = %user_id, data = ?q.data, "Received callback query");

    let Some(message) = q.message.as_ref() else {
        // The origin message is inaccessible; there is no chat to render
        // into, so just release the button.
        warn!(user_id = %user_id, "Callback query without an accessible message");
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };
    let chat_id = message.chat().id;

    let data = q.data.as_deref().unwrap_or("");
    let snapshot = state.catalog.snapshot();
    let current_category = state.sessions.current_category(user_id);

    match navigator::next_screen(data, &snapshot, current_category) {
        NextScreen::Menu => {
            screens::send_main_menu(&bot, &state, &snapshot, chat_id, user_id, &first_name)
                .await?;
        }
        NextScreen::Products(category) => {
            screens::send_category_products(&bot, &state, &snapshot, chat_id, user_id, category)
                .await?;
        }
        NextScreen::Detail(category, index) => {
            screens::send_product_details(
                &bot, &state, &snapshot, chat_id, user_id, category, index,
            )
            .await?;
        }
        NextScreen::NotFound => {
            screens::send_product_not_found(&bot, &state, chat_id, user_id).await?;
        }
        NextScreen::Ignore => {
            debug!(user_id = %user_id, data = %data, "Ignoring unknown callback payload");
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}
