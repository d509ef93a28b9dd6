//! Screens module: replacing the user's current screen
//!
//! Every screen send follows the same discipline: take the tracked message
//! id out of the session, best-effort delete it, send the new screen,
//! track the new id. The chat therefore shows one live screen per user,
//! not a history of menus.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, InputFile, ParseMode, UserId};
use tracing::{error, info, warn};

use crate::catalog::{Catalog, Category};
use crate::session::SessionTable;

use super::ui_builder;
use super::BotState;

/// Delete the screen currently tracked for the user, if any.
///
/// The id is taken out of the session before the delete attempt, so the
/// cleared state stands even when the transport refuses the deletion
/// (message already gone, too old to delete, and so on).
pub async fn delete_last_message(
    bot: &Bot,
    sessions: &SessionTable,
    user_id: UserId,
    chat_id: ChatId,
) {
    if let Some(message_id) = sessions.take_last_message(user_id) {
        match bot.delete_message(chat_id, message_id).await {
            Ok(_) => {
                info!(user_id = %user_id, message_id = message_id.0, "Deleted previous screen")
            }
            Err(err) => {
                warn!(user_id = %user_id, message_id = message_id.0, error = %err, "Failed to delete previous screen")
            }
        }
    }
}

/// Send the main menu: greeting with the category grid, preceded by the
/// usual delete of the previous screen and followed by the untracked
/// ordering instructions.
pub async fn send_main_menu(
    bot: &Bot,
    state: &BotState,
    catalog: &Catalog,
    chat_id: ChatId,
    user_id: UserId,
    first_name: &str,
) -> Result<()> {
    state.sessions.get_or_create(user_id);
    delete_last_message(bot, &state.sessions, user_id, chat_id).await;

    if catalog.is_empty() {
        let sent = bot
            .send_message(chat_id, ui_builder::catalog_unavailable_text())
            .await?;
        state.sessions.set_last_message(user_id, sent.id);
        warn!(user_id = %user_id, "Main menu requested but the catalog is empty");
        return Ok(());
    }

    let keyboard = ui_builder::category_keyboard(catalog);

    let sent = match send_menu_with_image(bot, state, chat_id, first_name, &keyboard).await {
        Ok(Some(sent)) => sent,
        // No image configured: plain text menu
        Ok(None) => {
            bot.send_message(chat_id, ui_builder::greeting_text(first_name))
                .reply_markup(keyboard)
                .await?
        }
        // Image download or send failed: text menu with a note
        Err(err) => {
            error!(user_id = %user_id, error = %err, "Menu image unavailable, sending text menu");
            bot.send_message(chat_id, ui_builder::greeting_fallback_text(first_name))
                .reply_markup(keyboard)
                .await?
        }
    };
    state.sessions.set_last_message(user_id, sent.id);

    // The instructions stay in the chat; only the menu itself is replaced
    // on navigation.
    bot.send_message(
        chat_id,
        ui_builder::instructions_text(&state.manager_handle),
    )
    .await?;

    info!(user_id = %user_id, "Sent main menu");
    Ok(())
}

/// The image variant of the menu. `Ok(None)` when no image is configured;
/// any download or send failure is an `Err` so the caller falls back to
/// the text variant.
async fn send_menu_with_image(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    first_name: &str,
    keyboard: &InlineKeyboardMarkup,
) -> Result<Option<Message>> {
    let Some(image_path) = state.menu_image.download().await? else {
        return Ok(None);
    };
    // The temp path must outlive the send; it removes the file on drop.
    let sent = bot
        .send_photo(chat_id, InputFile::file(image_path.to_path_buf()))
        .caption(ui_builder::greeting_text(first_name))
        .reply_markup(keyboard.clone())
        .await?;
    Ok(Some(sent))
}

/// Send the product list for a category, or the empty-category screen.
pub async fn send_category_products(
    bot: &Bot,
    state: &BotState,
    catalog: &Catalog,
    chat_id: ChatId,
    user_id: UserId,
    category: Category,
) -> Result<()> {
    state.sessions.set_category(user_id, category);
    delete_last_message(bot, &state.sessions, user_id, chat_id).await;

    let products = catalog.products(category);
    let sent = if products.is_empty() {
        bot.send_message(chat_id, ui_builder::category_empty_text())
            .reply_markup(ui_builder::back_to_menu_keyboard())
            .await?
    } else {
        bot.send_message(chat_id, ui_builder::category_title_text(category))
            .reply_markup(ui_builder::product_keyboard(category, products))
            .await?
    };
    state.sessions.set_last_message(user_id, sent.id);

    info!(user_id = %user_id, category = %category, products = products.len(), "Sent category products");
    Ok(())
}

/// Send the detail screen of one product.
pub async fn send_product_details(
    bot: &Bot,
    state: &BotState,
    catalog: &Catalog,
    chat_id: ChatId,
    user_id: UserId,
    category: Category,
    index: usize,
) -> Result<()> {
    let Some(product) = catalog.product(category, index) else {
        return send_product_not_found(bot, state, chat_id, user_id).await;
    };

    delete_last_message(bot, &state.sessions, user_id, chat_id).await;

    let sent = bot
        .send_message(chat_id, ui_builder::product_details_text(product))
        .parse_mode(ParseMode::Html)
        .reply_markup(ui_builder::product_details_keyboard())
        .await?;
    state.sessions.set_last_message(user_id, sent.id);

    info!(user_id = %user_id, category = %category, product = %product.name, "Sent product details");
    Ok(())
}

/// Screen for stale or invalid product references, with a way back.
pub async fn send_product_not_found(
    bot: &Bot,
    state: &BotState,
    chat_id: ChatId,
    user_id: UserId,
) -> Result<()> {
    delete_last_message(bot, &state.sessions, user_id, chat_id).await;

    let sent = bot
        .send_message(chat_id, ui_builder::product_not_found_text())
        .reply_markup(ui_builder::back_to_menu_keyboard())
        .await?;
    state.sessions.set_last_message(user_id, sent.id);

    warn!(user_id = %user_id, "Requested product not found");
    Ok(())
}
