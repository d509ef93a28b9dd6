//! Message Handler module for processing incoming Telegram messages

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, info};

use super::screens;
use super::ui_builder;
use super::BotState;

/// Handle incoming messages: `/start` opens the main menu, `/status`
/// answers a fixed liveness reply, anything else is ignored.
pub async fn message_handler(bot: Bot, msg: Message, state: Arc<BotState>) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    // Channel posts and service messages carry no sender to navigate for.
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    debug!(user_id = %user.id, "Received text message");

    if is_command(text, "/start") {
        let snapshot = state.catalog.snapshot();
        screens::send_main_menu(
            &bot,
            &state,
            &snapshot,
            msg.chat.id,
            user.id,
            &user.first_name,
        )
        .await?;
    } else if is_command(text, "/status") {
        // Liveness probe: fixed reply, no session involved.
        bot.send_message(msg.chat.id, ui_builder::status_text())
            .await?;
        info!(user_id = %user.id, "Status requested");
    }

    Ok(())
}

/// Match a command, tolerating the `/cmd@BotName` form used in groups.
fn is_command(text: &str, name: &str) -> bool {
    let first = text.split_whitespace().next().unwrap_or("");
    first == name
        || first
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('@'))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the plain and group-mention command forms match
    #[test]
    fn test_is_command_matches() {
        assert!(is_command("/start", "/start"));
        assert!(is_command("/start@DymokShopBot", "/start"));
        assert!(is_command("/status extra words", "/status"));
        assert!(is_command("  /status", "/status"));
    }

    /// Test lookalike commands do not match
    #[test]
    fn test_is_command_rejects_lookalikes() {
        assert!(!is_command("/startup", "/start"));
        assert!(!is_command("/statuses", "/status"));
        assert!(!is_command("start", "/start"));
        assert!(!is_command("", "/start"));
        assert!(!is_command("hello /start", "/start"));
    }
}
