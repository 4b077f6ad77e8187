//! Gamma API client: paginated event scans and the tag directory.
//!
//! Fetching is deliberately best-effort. A scan walks pages sequentially
//! and keeps whatever it has when a page fails: partial results are
//! surfaced with a warning, never turned into a process-level error.
//! There is no retry and no backoff.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::cache::{Clock, TtlCache};
use crate::config::GammaConfig;

/// Fixed Gamma page size; offsets step by this amount.
pub const PAGE_SIZE: u32 = 50;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("gamma returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Raw event object as returned by the events endpoint. Every field is
/// optional or defaulted; the flattener decides what a missing field means.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawEvent {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<RawTag>,
    pub markets: Vec<RawMarket>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTag {
    pub id: Option<Value>,
    pub label: Option<String>,
}

/// Raw market entry. Numeric fields stay as `Value` because the API mixes
/// numbers and quoted strings; `decode` owns the coercion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawMarket {
    pub question: Option<String>,
    pub volume: Option<Value>,
    pub liquidity: Option<Value>,
    pub end_date: Option<String>,
    pub outcome_prices: Option<Value>,
    pub outcomes: Option<Value>,
}

/// Everything a scan fetch produced, including how far it got and why it
/// stopped, if it stopped abnormally.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub events: Vec<RawEvent>,
    pub pages_fetched: u32,
    /// Set when a transport failure truncated the scan.
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub label: String,
}

/// Case-insensitive tag label lookup.
pub fn resolve_tag(tags: &[Tag], label: &str) -> Option<String> {
    tags.iter()
        .find(|t| t.label.eq_ignore_ascii_case(label.trim()))
        .map(|t| t.id.clone())
}

pub struct GammaClient {
    http: reqwest::Client,
    base_url: String,
    events_cache: TtlCache<FetchOutcome>,
    tags_cache: TtlCache<Vec<Tag>>,
}

impl GammaClient {
    pub fn new(config: &GammaConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            events_cache: TtlCache::new(config.events_ttl_seconds, clock.clone()),
            tags_cache: TtlCache::new(config.tags_ttl_seconds, clock),
        })
    }

    /// Fetch up to `pages` event pages, memoized per (pages, tag) for the
    /// configured events TTL.
    pub async fn fetch_events_cached(&self, pages: u32, tag_id: Option<&str>) -> FetchOutcome {
        let key = format!("events:pages={pages}:tag={}", tag_id.unwrap_or("-"));
        let result: Result<FetchOutcome, Infallible> = self
            .events_cache
            .get_or_fetch(&key, || async { Ok(self.fetch_events(pages, tag_id).await) })
            .await;
        match result {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Fetch up to `pages` sequential pages of open events, newest first.
    ///
    /// Stops early on an empty page or a non-success status; a transport
    /// failure aborts the loop and the accumulated events are returned
    /// with a warning attached.
    #[instrument(skip(self))]
    pub async fn fetch_events(&self, pages: u32, tag_id: Option<&str>) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();

        for page in 0..pages {
            let offset = page * PAGE_SIZE;
            match self.fetch_event_page(offset, tag_id).await {
                Ok(batch) if batch.is_empty() => {
                    debug!(page, "Empty page, scan complete");
                    break;
                }
                Ok(batch) => {
                    outcome.events.extend(batch);
                    outcome.pages_fetched += 1;
                }
                Err(FetchError::Status(status)) => {
                    debug!(page, %status, "Non-success status, stopping scan");
                    break;
                }
                Err(err) => {
                    warn!(page, error = %err, "Scan truncated by transport failure");
                    outcome.warning = Some(format!(
                        "scan stopped after {} page(s): {err}",
                        outcome.pages_fetched
                    ));
                    break;
                }
            }
        }

        debug!(
            events = outcome.events.len(),
            pages = outcome.pages_fetched,
            "Events fetched"
        );
        outcome
    }

    async fn fetch_event_page(
        &self,
        offset: u32,
        tag_id: Option<&str>,
    ) -> Result<Vec<RawEvent>, FetchError> {
        let url = format!("{}/events", self.base_url);
        let mut query: Vec<(&str, String)> = vec![
            ("closed", "false".to_string()),
            ("limit", PAGE_SIZE.to_string()),
            ("offset", offset.to_string()),
            ("order", "id".to_string()),
            ("ascending", "false".to_string()),
        ];
        if let Some(id) = tag_id {
            query.push(("tag_id", id.to_string()));
        }

        let resp = self.http.get(&url).query(&query).send().await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        Ok(resp.json::<Vec<RawEvent>>().await?)
    }

    /// Fetch the tag directory, memoized for the configured tags TTL.
    /// Entries without a label are dropped.
    pub async fn fetch_tags(&self) -> Result<Vec<Tag>, FetchError> {
        self.tags_cache
            .get_or_fetch("tags", || async {
                let url = format!("{}/tags", self.base_url);
                let resp = self.http.get(&url).send().await?;
                if !resp.status().is_success() {
                    return Err(FetchError::Status(resp.status()));
                }
                let raw: Vec<RawTag> = resp.json().await?;
                Ok(raw.into_iter().filter_map(tag_from_raw).collect())
            })
            .await
    }
}

fn tag_from_raw(raw: RawTag) -> Option<Tag> {
    let label = raw.label?;
    let id = match raw.id? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(Tag { id, label })
}
