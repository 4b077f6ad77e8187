use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel category for events carrying no tags.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Sentinel source for descriptions containing no URL.
pub const NO_LINK: &str = "No Link";

/// One flattened market row, rebuilt wholesale on every scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRecord {
    pub event_title: String,
    pub question: String,
    /// Event slug — deep-link path segment and audit cache key.
    pub slug: String,
    pub category: String,
    pub resolution_source: String,
    pub volume: f64,
    pub liquidity: f64,
    pub end_date: Option<DateTime<Utc>>,
    /// Sum of outcome prices. 1.0 is a well-formed market, >1.0 fee
    /// overhead, 0 < sum < 1.0 a potential arbitrage condition.
    pub price_sum: f64,
    /// (end_date - now) in days. Negative once the market has resolved.
    pub days_left: f64,
    /// volume / max(days_left, epsilon) — recency-weighted interest.
    pub action_density: f64,
}

impl MarketRecord {
    pub fn deep_link(&self) -> String {
        format!("https://polymarket.com/event/{}", self.slug)
    }
}

/// LLM manipulation-risk audit outcome for one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    pub risk_score: u8,
    pub verdict: Verdict,
    pub reasoning: String,
}

impl AuditResult {
    /// Sentinel returned when every candidate model failed.
    pub fn unavailable() -> Self {
        Self {
            risk_score: 0,
            verdict: Verdict::Error,
            reasoning: "AI unavailable.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Safe,
    Risky,
    Error,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "SAFE"),
            Self::Risky => write!(f, "RISKY"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Ranking key for the filtered result set. The risk-scan flow defaults to
/// action density, the source-scout flow to raw volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    #[default]
    ActionDensity,
    Volume,
}
