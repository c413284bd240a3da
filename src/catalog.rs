use std::{num::NonZeroU32, sync::Arc};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    error::{AppError, AppResult},
    models::MovieCreate,
};

/// Catalog subtree holding the movie datasets.
pub const MOVIES_SUBTREE: &str = "movies";

/// Catalog subtree holding the curated most-loved list.
pub const MOST_LOVED_SUBTREE: &str = "smdbmostloved";

/// Client for the Dataverse-style search API. Results come back in
/// offset-based pages; each leaf item carries the full movie metadata as a
/// JSON string in its `description` field.
pub struct CatalogClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    page_size: u64,
    max_pages: u64,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl CatalogClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        page_size: u64,
        max_pages: u64,
        rps: u32,
    ) -> Self {
        if api_key.trim().is_empty() {
            warn!("no CATALOG_API_KEY provided, catalog requests will be unauthenticated");
        }
        let limiter =
            Arc::new(RateLimiter::direct(Quota::per_second(NonZeroU32::new(rps.max(1)).unwrap())));
        Self { client, api_key, base_url, page_size: page_size.max(1), max_pages, limiter }
    }

    /// Fetches every page for `query` (wildcard when absent) under
    /// `subtree` and returns the decoded descriptions in catalog order.
    /// Any non-success response abandons the remaining pages.
    pub async fn search(&self, query: Option<&str>, subtree: &str) -> AppResult<Vec<MovieCreate>> {
        let query = query.unwrap_or("*");
        let mut out = Vec::new();
        let mut start = 0u64;
        let mut pages = 0u64;

        loop {
            self.limiter.until_ready().await;
            let page = self.fetch_page(query, subtree, start).await?;
            debug!(subtree = %subtree, start = start, total = page.total_count, items = page.items.len(), "fetched catalog page");

            out.extend(decode_items(page.items));

            pages += 1;
            start += self.page_size;
            if start >= page.total_count {
                break;
            }
            if pages >= self.max_pages {
                warn!(subtree = %subtree, max_pages = self.max_pages, total = page.total_count, "catalog page cap reached, truncating fetch");
                break;
            }
        }

        debug!(subtree = %subtree, movies = out.len(), "completed catalog fetch");
        Ok(out)
    }

    async fn fetch_page(&self, query: &str, subtree: &str, start: u64) -> AppResult<SearchData> {
        let url = format!("{}/api/search", self.base_url.trim_end_matches('/'));
        let mut req = self
            .client
            .get(url)
            .query(&[("q", query), ("subtree", subtree)])
            .query(&[("start", start), ("per_page", self.page_size)]);
        if !self.api_key.is_empty() {
            req = req.header("X-Dataverse-key", &self.api_key);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "catalog returned {}",
                resp.status()
            )));
        }

        let envelope: SearchEnvelope = resp.json().await?;
        Ok(envelope.data)
    }
}

/// Keeps leaf items with a decodable description. Container items (type
/// `dataverse`) carry no movie metadata.
fn decode_items(items: Vec<SearchItem>) -> Vec<MovieCreate> {
    let mut out = Vec::new();
    for item in items {
        if item.kind == "dataverse" {
            continue;
        }
        let Some(description) = item.description else {
            continue;
        };
        match serde_json::from_str::<MovieCreate>(&description) {
            Ok(movie) => out.push(movie),
            Err(err) => {
                warn!(name = %item.name, error = %err, "skipping undecodable catalog description");
            },
        }
    }
    out
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    data: SearchData,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    items: Vec<SearchItem>,
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
}
