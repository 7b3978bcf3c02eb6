//! Stocks CLI - Command line access to the StocksRUs analysis engine.
//!
//! Prints JSON responses on stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use stocks_core::{
    ApiResponse, Config, MemoryPriceSource, MovingAverageWindow, PriceSeries, RecentlyViewedCache,
    RecentlyViewedStore, Result, Session, Slot, StockEntry, TimeWindow,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "stocks")]
#[command(about = "StocksRUs CLI - moving average signals and recently viewed stocks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a stock's closing prices with up to two moving averages
    Analyze {
        /// JSON file with `[{"date": "YYYY-MM-DD", "close": 1.0}, ...]`
        #[arg(short, long)]
        prices: PathBuf,
        /// Stock ticker symbol
        #[arg(short, long)]
        ticker: String,
        /// Display name (defaults to the ticker)
        #[arg(short, long)]
        name: Option<String>,
        /// Time window: 1y, 2y, 5y or all
        #[arg(short, long, default_value = "all")]
        window: TimeWindow,
        /// First moving average: 20, 50, 100 or 200
        #[arg(long)]
        first: Option<MovingAverageWindow>,
        /// Second moving average: 20, 50, 100 or 200
        #[arg(long)]
        second: Option<MovingAverageWindow>,
        /// Record the view in this user's recently viewed list
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Recently viewed stocks
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },
}

#[derive(Subcommand)]
enum RecentAction {
    /// List a user's recently viewed stocks, most recent first
    List {
        /// User identifier (e.g. email)
        #[arg(short, long)]
        user: String,
    },
    /// Record that a user viewed a stock
    View {
        /// User identifier (e.g. email)
        #[arg(short, long)]
        user: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Stock ticker symbol
        #[arg(short, long)]
        ticker: String,
    },
}

fn main() {
    // Logs on stderr keep stdout clean for JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let output = match Config::load() {
        Ok(config) => match cli.command {
            Commands::Analyze {
                prices,
                ticker,
                name,
                window,
                first,
                second,
                user,
            } => {
                let stock = StockEntry::new(name.unwrap_or_else(|| ticker.clone()), ticker);
                respond(handle_analyze(
                    &config,
                    &prices,
                    stock,
                    window,
                    [first, second],
                    user.as_deref(),
                ))
            }
            Commands::Recent { action } => respond(handle_recent(&config, action)),
        },
        Err(e) => respond::<()>(Err(e)),
    };

    println!("{}", output);
}

/// Render a result as a JSON `ApiResponse`.
fn respond<T: Serialize>(result: Result<T>) -> String {
    let rendered = match result {
        Ok(data) => serde_json::to_string_pretty(&ApiResponse::ok(data)),
        Err(e) => {
            tracing::error!("{}", e);
            serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string()))
        }
    };
    rendered.unwrap_or_else(|e| json!({ "ok": false, "error": e.to_string() }).to_string())
}

fn load_history(path: &Path) -> Result<PriceSeries> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn handle_analyze(
    config: &Config,
    prices: &Path,
    stock: StockEntry,
    window: TimeWindow,
    averages: [Option<MovingAverageWindow>; 2],
    user: Option<&str>,
) -> Result<serde_json::Value> {
    let source = MemoryPriceSource::new().with_history(stock.ticker.clone(), load_history(prices)?);
    let store = RecentlyViewedStore::new(&config.recent_dir);

    let mut session = match user {
        Some(user) => Session::open(user, config, &store)?,
        None => Session::new("", config, RecentlyViewedCache::new(config.recent_capacity)?),
    };

    session.view(stock)?;
    session.select_time_window(window);
    for (slot, average) in [Slot::First, Slot::Second].into_iter().zip(averages) {
        if let Some(average) = average {
            session.select_average(slot, average);
        }
    }

    let analysis = session.analyze(&source)?;

    if user.is_some() {
        session.close(&store)?;
    }

    Ok(json!({
        "stock": analysis.stock,
        "series": analysis.time_window.series_name(),
        "samples": analysis.prices.len(),
        "averages": analysis.averages.iter().map(|ma| json!({
            "name": MovingAverageWindow::from_days(ma.window).map(|w| w.series_name()),
            "window": ma.window,
            "points": ma.len(),
            "last": ma.points.last(),
        })).collect::<Vec<_>>(),
        "buy_events": analysis.buy_events().collect::<Vec<_>>(),
        "sell_events": analysis.sell_events().collect::<Vec<_>>(),
        "recommendation": analysis.recommendation.to_string(),
    }))
}

fn handle_recent(config: &Config, action: RecentAction) -> Result<serde_json::Value> {
    let store = RecentlyViewedStore::new(&config.recent_dir);

    match action {
        RecentAction::List { user } => {
            let cache = store.load(&user, config.recent_capacity)?;
            Ok(json!({
                "user": user,
                "recent": cache.iter().collect::<Vec<_>>(),
            }))
        }
        RecentAction::View { user, name, ticker } => {
            let mut cache = store.load(&user, config.recent_capacity)?;
            cache.record_access(StockEntry::new(name, ticker))?;
            let saved = store.save(&user, &cache)?;
            Ok(json!({
                "user": user,
                "saved": saved,
                "recent": cache.iter().collect::<Vec<_>>(),
            }))
        }
    }
}
