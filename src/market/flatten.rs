//! Flattening: raw event objects into one `MarketRecord` per market.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::market::decode;
use crate::market::derive;
use crate::market::gamma::RawEvent;
use crate::market::models::{MarketRecord, NO_LINK, UNCATEGORIZED};
use crate::market::source::extract_source;

/// Flatten every market under every event into records, deriving the
/// secondary metrics against `now`. Missing fields become defaults or
/// sentinels; nothing here fails.
pub fn flatten_events(events: &[RawEvent], now: DateTime<Utc>) -> Vec<MarketRecord> {
    let mut records = Vec::new();

    for event in events {
        let event_title = event.title.clone().unwrap_or_default();
        let slug = event.slug.clone().unwrap_or_default();
        let category = event
            .tags
            .first()
            .and_then(|t| t.label.clone())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let resolution_source = event
            .description
            .as_deref()
            .map(extract_source)
            .unwrap_or_else(|| NO_LINK.to_string());

        for market in &event.markets {
            let volume = decode::lenient_f64(market.volume.as_ref());
            let liquidity = decode::lenient_f64(market.liquidity.as_ref());
            let prices = decode::price_list(market.outcome_prices.as_ref());
            let end_date = market.end_date.as_deref().and_then(parse_end_date);

            // Malformed or absent end dates leave days_left at 0, which the
            // resolved-market exclusion then filters out.
            let days_left = end_date.map(|end| derive::days_left(end, now)).unwrap_or(0.0);

            records.push(MarketRecord {
                event_title: event_title.clone(),
                question: market.question.clone().unwrap_or_default(),
                slug: slug.clone(),
                category: category.clone(),
                resolution_source: resolution_source.clone(),
                volume,
                liquidity,
                end_date,
                price_sum: derive::price_sum(&prices),
                days_left,
                action_density: derive::action_density(volume, days_left),
            });
        }
    }

    debug!(
        events = events.len(),
        records = records.len(),
        "Events flattened"
    );
    records
}

/// Parse an RFC 3339 end date and normalize it to UTC.
fn parse_end_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
