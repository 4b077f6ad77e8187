//! Plain-text rendering of scan results.
//!
//! The pipeline's only output surface: a row per market with the derived
//! metrics, the deep link, price-sum advisories, and the risk badge when
//! an audit exists.

use crate::cache::AuditCache;
use crate::market::models::{AuditResult, MarketRecord};

/// Price sums above this signal fee load baked into the book.
pub const FEE_THRESHOLD: f64 = 1.02;

/// Price sums below this (but above zero) signal a potential arbitrage.
pub const ARB_THRESHOLD: f64 = 0.98;

/// Advisory derived from the outcome-price sum.
pub fn price_sum_note(price_sum: f64) -> Option<String> {
    if price_sum > FEE_THRESHOLD {
        Some(format!("high spread/fees (sum {price_sum:.2})"))
    } else if price_sum > 0.0 && price_sum < ARB_THRESHOLD {
        Some(format!("arbitrage chance? (sum {price_sum:.2})"))
    } else {
        None
    }
}

pub fn risk_badge(audit: &AuditResult) -> String {
    format!(
        "[{} {}/10] {}",
        audit.verdict, audit.risk_score, audit.reasoning
    )
}

fn format_row(rec: &MarketRecord, audits: &AuditCache) -> String {
    let mut row = format!(
        "{:<14} {:<22} {:<48} ${:>12.0} {:>6.1}d\n    {}",
        truncate(&rec.category, 14),
        truncate(&rec.resolution_source, 22),
        truncate(&rec.question, 48),
        rec.volume,
        rec.days_left,
        rec.deep_link(),
    );
    if let Some(note) = price_sum_note(rec.price_sum) {
        row.push_str(&format!("\n    note: {note}"));
    }
    if let Some(audit) = audits.get(&rec.slug) {
        row.push_str(&format!("\n    risk: {}", risk_badge(&audit)));
    }
    row
}

/// Render the full result table. An empty result set renders as a single
/// explanatory line rather than an empty string.
pub fn render_table(records: &[MarketRecord], audits: &AuditCache) -> String {
    if records.is_empty() {
        return "No markets matched the scan filters.".to_string();
    }

    let mut out = format!(
        "{:<14} {:<22} {:<48} {:>13} {:>7}\n",
        "Category", "Source", "Market", "Volume", "Ends"
    );
    for rec in records {
        out.push_str(&format_row(rec, audits));
        out.push('\n');
    }
    out.push_str(&format!("{} opportunities", records.len()));
    out
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
