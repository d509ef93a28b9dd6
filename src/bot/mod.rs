//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `message_handler`: Handles the `/start` and `/status` commands
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `navigator`: Pure callback-payload parsing and screen decisions
//! - `screens`: Screen replacement (delete previous, send new, track id)
//! - `ui_builder`: Creates keyboards and formats messages

pub mod callback_handler;
pub mod message_handler;
pub mod navigator;
pub mod screens;
pub mod ui_builder;

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::catalog::CatalogStore;
use crate::media::MenuImage;
use crate::session::SessionTable;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

/// Shared state handed to every handler by the dispatcher.
pub struct BotState {
    /// Live catalog, written by the background refresher.
    pub catalog: Arc<CatalogStore>,
    /// Per-user navigation sessions, swept by the idle sweeper.
    pub sessions: Arc<SessionTable>,
    /// Header image download for the main menu.
    pub menu_image: MenuImage,
    /// Handle shown in the ordering instructions.
    pub manager_handle: String,
}

/// Build the dispatcher's handler tree: messages and callback queries.
pub fn handler_tree() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler))
}
