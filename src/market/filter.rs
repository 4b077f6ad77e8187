//! Predicate filtering and ranking of flattened market rows.

use crate::market::models::{MarketRecord, SortKey};

/// User-supplied scan predicates. `None` / empty text on any dimension
/// means pass-through for that dimension.
#[derive(Debug, Clone, Default)]
pub struct ScanFilters {
    pub min_volume: Option<f64>,
    pub max_days_left: Option<f64>,
    pub category_contains: Option<String>,
    pub source_contains: Option<String>,
}

impl ScanFilters {
    fn accepts(&self, rec: &MarketRecord) -> bool {
        // Already-resolved markets are always excluded.
        if rec.days_left <= 0.0 {
            return false;
        }
        if let Some(min) = self.min_volume {
            if rec.volume < min {
                return false;
            }
        }
        if let Some(max) = self.max_days_left {
            if rec.days_left > max {
                return false;
            }
        }
        if !substring_match(&self.category_contains, &rec.category) {
            return false;
        }
        if !substring_match(&self.source_contains, &rec.resolution_source) {
            return false;
        }
        true
    }
}

fn substring_match(needle: &Option<String>, haystack: &str) -> bool {
    match needle.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}

/// Keep the records satisfying all active predicates, sorted descending by
/// the chosen key.
pub fn filter_and_rank(
    records: Vec<MarketRecord>,
    filters: &ScanFilters,
    sort: SortKey,
) -> Vec<MarketRecord> {
    let mut kept: Vec<MarketRecord> = records
        .into_iter()
        .filter(|rec| filters.accepts(rec))
        .collect();

    kept.sort_by(|a, b| {
        let (ka, kb) = match sort {
            SortKey::ActionDensity => (a.action_density, b.action_density),
            SortKey::Volume => (a.volume, b.volume),
        };
        kb.total_cmp(&ka)
    });

    kept
}
