//! # Catalog Refresh
//!
//! Fetching the remote catalog document and the periodic refresh tick. A
//! successful fetch replaces the store wholesale; a failed one is logged
//! and leaves the previous catalog serving, so the menu degrades to stale
//! data instead of going blank.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogStore, Product};
use crate::periodic::PeriodicTask;

/// Failure modes of one catalog fetch attempt.
#[derive(Debug)]
pub enum FetchError {
    /// Transport errors: connect, timeout, body read
    Http(reqwest::Error),
    /// Non-success HTTP status from the document host
    Status(StatusCode),
    /// Document did not decode as the expected category map
    Decode(serde_json::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(err) => write!(f, "Request error: {err}"),
            FetchError::Status(status) => write!(f, "Unexpected status: {status}"),
            FetchError::Decode(err) => write!(f, "Malformed catalog document: {err}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err)
    }
}

/// Source of catalog snapshots. Production talks HTTP; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Catalog, FetchError>;
}

/// Fetches and decodes the catalog document over HTTP.
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<Catalog, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.text().await?;
        let document: HashMap<String, Vec<Product>> = serde_json::from_str(&body)?;
        Ok(Catalog::from_document(document))
    }
}

/// Run one refresh tick against the store. Returns whether the fetch
/// succeeded; on failure the store keeps its previous catalog.
pub async fn refresh_once(store: &CatalogStore, source: &dyn CatalogSource) -> bool {
    match source.fetch_catalog().await {
        Ok(catalog) => {
            info!(categories = catalog.categories().len(), "Catalog refreshed");
            store.replace(catalog);
            true
        }
        Err(err) => {
            warn!(error = %err, "Catalog refresh failed, keeping previous data");
            false
        }
    }
}

/// Spawn the background refresher: one fetch attempt per `period`, no
/// backoff or jitter between attempts.
pub fn spawn_refresher(
    store: Arc<CatalogStore>,
    source: Arc<dyn CatalogSource>,
    period: Duration,
) -> PeriodicTask {
    PeriodicTask::spawn("catalog-refresh", period, move || {
        let store = store.clone();
        let source = source.clone();
        async move {
            refresh_once(&store, source.as_ref()).await;
        }
    })
}
