//! Derived per-record metrics: time to resolution, price sum, and the
//! volume-per-day ranking signal.

use chrono::{DateTime, Utc};

/// Floor applied to `days_left` before dividing, so markets at the edge of
/// resolution do not blow the density up to infinity.
pub const MIN_DAYS_FLOOR: f64 = 0.1;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fractional days between `now` and `end_date`, negative for markets that
/// already resolved. Both instants are UTC, so the subtraction never mixes
/// naive and aware timestamps.
pub fn days_left(end_date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (end_date - now).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Volume normalized by remaining time. Monotonically non-decreasing in
/// volume, non-increasing in days_left down to the epsilon floor.
pub fn action_density(volume: f64, days_left: f64) -> f64 {
    volume / days_left.max(MIN_DAYS_FLOOR)
}

/// Arithmetic sum of outcome prices; 0.0 for an empty sequence.
pub fn price_sum(prices: &[f64]) -> f64 {
    prices.iter().sum()
}
