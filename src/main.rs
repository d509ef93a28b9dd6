use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dymok::bot::{self, BotState};
use dymok::catalog::CatalogStore;
use dymok::config::BotConfig;
use dymok::keepalive;
use dymok::media::MenuImage;
use dymok::refresh::{self, HttpCatalogSource};
use dymok::session::{self, SessionTable};

/// Delay between dispatcher restarts after a crash.
const RESTART_DELAY: Duration = Duration::from_secs(5);

/// Timeout for catalog and image requests.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting Dymok storefront bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    // One client for both the catalog document and the menu image.
    let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let catalog = Arc::new(CatalogStore::new());
    let sessions = Arc::new(SessionTable::new());
    let source = Arc::new(HttpCatalogSource::new(
        client.clone(),
        config.products_url.clone(),
    ));

    // One fetch before accepting updates. On failure the bot still starts
    // and the menu advertises the catalog as unavailable.
    if !refresh::refresh_once(&catalog, source.as_ref()).await {
        error!("Initial catalog fetch failed, starting with an empty catalog");
    }

    let refresher = refresh::spawn_refresher(catalog.clone(), source, config.refresh_period);
    let sweeper = session::spawn_sweeper(sessions.clone(), config.session_ttl);

    let keepalive_port = config.keepalive_port;
    tokio::spawn(async move {
        if let Err(err) = keepalive::serve(keepalive_port).await {
            error!(error = %err, "Keep-alive endpoint failed");
        }
    });

    let bot = Bot::new(config.bot_token.clone());
    let state = Arc::new(BotState {
        catalog: catalog.clone(),
        sessions: sessions.clone(),
        menu_image: MenuImage::new(client, config.menu_image_file_id.clone()),
        manager_handle: config.manager_handle.clone(),
    });

    info!("Bot initialized, starting dispatcher");

    // The dispatcher runs supervised: a panic inside dispatch is logged and
    // the dispatcher is rebuilt after a short delay. A clean return
    // (ctrl-c) exits the loop.
    loop {
        let dispatch = tokio::spawn(run_dispatcher(bot.clone(), state.clone()));
        match dispatch.await {
            Ok(()) => {
                info!("Dispatcher stopped cleanly, shutting down");
                break;
            }
            Err(err) => {
                error!(
                    error = %err,
                    delay_secs = RESTART_DELAY.as_secs(),
                    "Dispatcher crashed, restarting"
                );
                tokio::time::sleep(RESTART_DELAY).await;
                info!("Restarting dispatcher");
            }
        }
    }

    refresher.stop().await;
    sweeper.stop().await;

    Ok(())
}

async fn run_dispatcher(bot: Bot, state: Arc<BotState>) {
    Dispatcher::builder(bot, bot::handler_tree())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
