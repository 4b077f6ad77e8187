use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Bounds for the user-tunable scan knobs, mirrored by the CLI.
pub const PAGES_RANGE: (u32, u32) = (1, 10);
pub const MIN_VOLUME_RANGE: (f64, f64) = (5_000.0, 10_000_000.0);
pub const MAX_DAYS_RANGE: (f64, f64) = (0.5, 30.0);

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub scanning: ScanningConfig,
    pub gamma: GammaConfig,
    pub audit: AuditConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanningConfig {
    /// Pages per scan, 50 events each.
    pub pages: u32,
    /// Volume floor in dollars.
    pub min_volume: f64,
    /// Resolution horizon in days.
    pub max_days_left: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GammaConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub events_ttl_seconds: i64,
    pub tags_ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    pub base_url: String,
    pub referer: String,
    pub timeout_seconds: u64,
    /// Candidate models tried in order; the first parseable answer wins.
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
}

/// Secrets loaded exclusively from environment variables.
/// Not serializable, not stored in config files.
pub struct Secrets {
    pub openrouter_api_key: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
        }
    }
}

impl AppConfig {
    /// Load configuration from config/default.toml, overlaying environment
    /// variables for secrets.
    pub fn load() -> Result<(Self, Secrets)> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: AppConfig =
            toml::from_str(&contents).context("Failed to parse config/default.toml")?;
        config.validate()?;

        let secrets = Secrets::from_env();

        Ok((config, secrets))
    }

    /// Reject scan knobs outside their sidebar ranges.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scanning;
        if s.pages < PAGES_RANGE.0 || s.pages > PAGES_RANGE.1 {
            bail!(
                "scanning.pages must be within {}..={}, got {}",
                PAGES_RANGE.0,
                PAGES_RANGE.1,
                s.pages
            );
        }
        if s.min_volume < MIN_VOLUME_RANGE.0 || s.min_volume > MIN_VOLUME_RANGE.1 {
            bail!(
                "scanning.min_volume must be within {}..={}, got {}",
                MIN_VOLUME_RANGE.0,
                MIN_VOLUME_RANGE.1,
                s.min_volume
            );
        }
        if s.max_days_left < MAX_DAYS_RANGE.0 || s.max_days_left > MAX_DAYS_RANGE.1 {
            bail!(
                "scanning.max_days_left must be within {}..={}, got {}",
                MAX_DAYS_RANGE.0,
                MAX_DAYS_RANGE.1,
                s.max_days_left
            );
        }
        if self.audit.models.is_empty() {
            bail!("audit.models must list at least one candidate model");
        }
        Ok(())
    }
}
