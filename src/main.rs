use std::path::PathBuf;

use analytics::ChartEngine;
use anyhow::Context;
use catalog::{Catalog, FilterState, FilterUpdate};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use configuration::{Config, load_config};
use core_types::{Category, Ebook, Level, PerformanceData, SortOption};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Meridian platform CLI.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalog(args) => handle_catalog(args),
        Commands::Report(args) => handle_report(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Marketplace catalog queries and trading-chart analytics for the Meridian
/// forex platform.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the ebook marketplace catalog.
    Catalog(CatalogArgs),
    /// Build the chart-analytics report for a trade history.
    Report(ReportArgs),
}

#[derive(Parser)]
struct CatalogArgs {
    /// Case-insensitive search over title, author, description and topics.
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, value_enum)]
    category: Option<Category>,

    #[arg(long, value_enum)]
    level: Option<Level>,

    /// Lower price bound (inclusive).
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Upper price bound (inclusive).
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Keep only items rated at least this highly (0-5).
    #[arg(long)]
    min_rating: Option<Decimal>,

    /// Required delivery format (e.g. "PDF").
    #[arg(long)]
    format: Option<String>,

    #[arg(long)]
    language: Option<String>,

    /// Featured items only.
    #[arg(long)]
    featured: bool,

    /// Bestsellers only.
    #[arg(long)]
    bestseller: bool,

    /// Discounted items only.
    #[arg(long)]
    on_sale: bool,

    #[arg(long, value_enum, default_value = "popular")]
    sort: SortOption,

    /// Catalog JSON file; defaults to the path in config.toml.
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Parser)]
struct ReportArgs {
    /// Performance JSON file; defaults to the path in config.toml.
    #[arg(long)]
    file: Option<PathBuf>,
}

// ==============================================================================
// Catalog Command Logic
// ==============================================================================

fn handle_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let path = resolve_path(args.file.clone(), |config| config.data.catalog_file.clone())?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;
    let items: Vec<Ebook> =
        serde_json::from_str(&raw).context("catalog file is not a valid ebook array")?;
    let catalog = Catalog::new(items).context("catalog failed invariant checks")?;
    tracing::info!(items = catalog.len(), file = %path.display(), "catalog loaded");

    let filters = build_filters(&args);
    let visible = catalog.visible(&filters, &args.search, args.sort);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Title",
        "Author",
        "Category",
        "Level",
        "Price",
        "Rating",
        "Reviews",
    ]);
    for item in &visible {
        let price = match item.discount {
            Some(d) if d > Decimal::ZERO => format!("{} (-{}%)", item.price, d),
            _ => item.price.to_string(),
        };
        table.add_row(vec![
            item.title.clone(),
            item.author.clone(),
            item.category.to_string(),
            item.level.to_string(),
            price,
            item.rating.to_string(),
            item.reviews.to_string(),
        ]);
    }

    println!("{table}");
    println!("{} of {} items match", visible.len(), catalog.len());
    Ok(())
}

/// Translates the optional CLI flags into single-dimension filter updates.
fn build_filters(args: &CatalogArgs) -> FilterState {
    let mut filters = FilterState::default();

    if let Some(category) = args.category {
        filters.apply(FilterUpdate::Category(Some(category)));
    }
    if let Some(level) = args.level {
        filters.apply(FilterUpdate::Level(Some(level)));
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        let min = args.min_price.unwrap_or(Decimal::ZERO);
        let max = args.max_price.unwrap_or(Decimal::MAX);
        filters.apply(FilterUpdate::PriceRange(Some((min, max))));
    }
    if let Some(rating) = args.min_rating {
        filters.apply(FilterUpdate::MinRating(rating));
    }
    if let Some(format) = args.format.clone() {
        filters.apply(FilterUpdate::Format(Some(format)));
    }
    if let Some(language) = args.language.clone() {
        filters.apply(FilterUpdate::Language(Some(language)));
    }
    if args.featured {
        filters.apply(FilterUpdate::FeaturedOnly(true));
    }
    if args.bestseller {
        filters.apply(FilterUpdate::BestsellerOnly(true));
    }
    if args.on_sale {
        filters.apply(FilterUpdate::OnSaleOnly(true));
    }

    filters
}

// ==============================================================================
// Report Command Logic
// ==============================================================================

fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let path = resolve_path(args.file, |config| config.data.performance_file.clone())?;
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read performance file {}", path.display()))?;
    let data: PerformanceData =
        serde_json::from_str(&raw).context("performance file is not valid performance data")?;
    tracing::info!(
        trades = data.trades.len(),
        samples = data.performance.len(),
        file = %path.display(),
        "performance data loaded"
    );

    let engine = ChartEngine::new();

    println!("\nMonthly returns");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Month", "Return %"]);
    for month in engine.monthly_returns(&data.performance) {
        table.add_row(vec![month.month, format!("{:+.2}", month.return_pct)]);
    }
    println!("{table}");

    if !data.trades.is_empty() {
        let histogram = engine.profit_distribution(&data.trades)?;
        println!("\nProfit distribution");
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["Bin floor", "Trades"]);
        for (edge, count) in histogram.bins.iter().zip(&histogram.frequencies) {
            table.add_row(vec![format!("{edge:.2}"), count.to_string()]);
        }
        println!("{table}");
    }

    let pairs = engine.correlation_by_pair(&data.trades);
    if pairs.is_empty() {
        println!("\nNo pair reached the 10-trade cutoff for win-rate statistics");
    } else {
        println!("\nWin rate by pair");
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["Pair", "Trades", "Win %"]);
        for pair in pairs {
            table.add_row(vec![
                pair.pair,
                pair.trades.to_string(),
                format!("{:.1}", pair.win_rate_pct),
            ]);
        }
        println!("{table}");
    }

    println!("\nTrade timing by hour (UTC)");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Hour", "Trades", "Win %", "Avg profit"]);
    for slot in engine.trade_timing_by_hour(&data.trades) {
        table.add_row(vec![
            format!("{:02}", slot.hour),
            slot.trades.to_string(),
            format!("{:.1}", slot.win_rate_pct),
            format!("{:.2}", slot.average_profit),
        ]);
    }
    println!("{table}");

    match engine.rolling_risk_metrics(&data.performance).last() {
        Some(latest) => {
            println!("\nLatest rolling risk metrics ({})", latest.timestamp);
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
            table.add_row(vec!["Mean return".to_string(), format!("{:.4}", latest.mean_return)]);
            table.add_row(vec!["Volatility".to_string(), format!("{:.4}", latest.volatility)]);
            table.add_row(vec![
                "Max drawdown %".to_string(),
                format!("{:.2}", latest.max_drawdown_pct),
            ]);
            table.add_row(vec!["Sharpe".to_string(), fmt_ratio(latest.sharpe_ratio)]);
            table.add_row(vec!["Sortino".to_string(), fmt_ratio(latest.sortino_ratio)]);
            table.add_row(vec!["Calmar".to_string(), fmt_ratio(latest.calmar_ratio)]);
            table.add_row(vec!["Alpha".to_string(), format!("{:.4}", latest.alpha)]);
            table.add_row(vec!["Beta".to_string(), format!("{:.1}", latest.beta)]);
            println!("{table}");
        }
        None => println!("\nNot enough history for rolling risk metrics (needs more than 30 samples)"),
    }

    let events = engine.significant_events(&data.performance, &data.trades);
    println!("\nSignificant events");
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Date", "Kind", "Event"]);
    for event in events {
        table.add_row(vec![
            event.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            event.kind.to_string(),
            event.description,
        ]);
    }
    println!("{table}");

    Ok(())
}

fn fmt_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "n/a".to_string(),
    }
}

/// CLI flags win over config.toml; the config file is only read when needed.
fn resolve_path(
    flag: Option<PathBuf>,
    from_config: impl Fn(&Config) -> PathBuf,
) -> anyhow::Result<PathBuf> {
    match flag {
        Some(path) => Ok(path),
        None => {
            let config =
                load_config().context("no --file given and config.toml could not be loaded")?;
            Ok(from_config(&config))
        }
    }
}
