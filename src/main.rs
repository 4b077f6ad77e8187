use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use polysniper::audit::auditor::RiskAuditor;
use polysniper::cache::{AuditCache, Clock, SystemClock};
use polysniper::config::AppConfig;
use polysniper::market::filter::{filter_and_rank, ScanFilters};
use polysniper::market::flatten::flatten_events;
use polysniper::market::gamma::{resolve_tag, GammaClient};
use polysniper::market::models::SortKey;
use polysniper::monitoring::logger;
use polysniper::render::render_table;

#[derive(Parser)]
#[command(name = "polysniper", about = "Polymarket opportunity scanner")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan open markets, filter, rank, and optionally audit them
    Scan(ScanArgs),
    /// List the category tags known to the platform
    Tags,
}

#[derive(Args)]
struct ScanArgs {
    /// Pages to fetch, 50 events each
    #[arg(long)]
    pages: Option<u32>,

    /// Minimum market volume in dollars
    #[arg(long)]
    min_volume: Option<f64>,

    /// Only markets resolving within this many days
    #[arg(long)]
    max_days: Option<f64>,

    /// Restrict the scan to one platform tag (by label)
    #[arg(long)]
    tag: Option<String>,

    /// Case-insensitive substring filter on category
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive substring filter on resolution source
    #[arg(long)]
    source: Option<String>,

    /// Ranking key
    #[arg(long, value_enum, default_value = "action-density")]
    sort: SortKey,

    /// Run the LLM risk audit on the top N results
    #[arg(long, default_value_t = 0)]
    audit_top: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, secrets) = AppConfig::load()?;

    logger::init_logging(&config.monitoring)?;

    match cli.command {
        Command::Scan(args) => run_scan(config, secrets, args).await,
        Command::Tags => run_tags(config).await,
    }
}

async fn run_scan(
    mut config: AppConfig,
    secrets: polysniper::config::Secrets,
    args: ScanArgs,
) -> Result<()> {
    if let Some(pages) = args.pages {
        config.scanning.pages = pages;
    }
    if let Some(min_volume) = args.min_volume {
        config.scanning.min_volume = min_volume;
    }
    if let Some(max_days) = args.max_days {
        config.scanning.max_days_left = max_days;
    }
    config.validate()?;

    let clock = Arc::new(SystemClock);
    let gamma = GammaClient::new(&config.gamma, clock.clone())?;

    let tag_id = match &args.tag {
        Some(label) => {
            let tags = gamma.fetch_tags().await?;
            match resolve_tag(&tags, label) {
                Some(id) => Some(id),
                None => bail!("Unknown tag label: {label}"),
            }
        }
        None => None,
    };

    tracing::info!(
        pages = config.scanning.pages,
        min_volume = config.scanning.min_volume,
        max_days = config.scanning.max_days_left,
        tag = args.tag.as_deref().unwrap_or("all"),
        "Starting scan"
    );

    let outcome = gamma
        .fetch_events_cached(config.scanning.pages, tag_id.as_deref())
        .await;
    if let Some(warning) = &outcome.warning {
        tracing::warn!(warning, "Partial scan results");
    }

    let now = clock.now();
    let records = flatten_events(&outcome.events, now);

    let filters = ScanFilters {
        min_volume: Some(config.scanning.min_volume),
        max_days_left: Some(config.scanning.max_days_left),
        category_contains: args.category.clone(),
        source_contains: args.source.clone(),
    };
    let results = filter_and_rank(records, &filters, args.sort);
    tracing::info!(count = results.len(), "Scan complete");

    let audits = AuditCache::new();
    if args.audit_top > 0 {
        let Some(api_key) = secrets.openrouter_api_key else {
            bail!("OPENROUTER_API_KEY must be set to run audits");
        };
        let auditor = RiskAuditor::new(&config.audit, api_key, clock.clone())?;
        for rec in results.iter().take(args.audit_top) {
            auditor
                .audit(&audits, &rec.question, &rec.event_title, &rec.slug)
                .await;
        }
    }

    println!("{}", render_table(&results, &audits));
    Ok(())
}

async fn run_tags(config: AppConfig) -> Result<()> {
    let clock = Arc::new(SystemClock);
    let gamma = GammaClient::new(&config.gamma, clock)?;

    let mut tags = gamma.fetch_tags().await?;
    tags.sort_by(|a, b| a.label.cmp(&b.label));

    for tag in &tags {
        println!("{}", tag.label);
    }
    tracing::info!(count = tags.len(), "Tags listed");
    Ok(())
}
