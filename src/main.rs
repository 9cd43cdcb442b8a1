//! seller-analytics: Ozon seller order and finance summaries.
//!
//! Single-binary Tokio application that:
//! 1. Loads static Seller API credentials
//! 2. Resolves a Moscow-time reporting window
//! 3. Fetches and normalizes postings, finance totals, or reviews
//! 4. Prints the aggregated structure as JSON for the presentation layer

mod config;

use std::collections::BTreeMap;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use analytics::order_record;
use common::{
    AggregateSummary, BotConfig, Error, FinancialTotals, OrderRecord, ReviewSummary,
    TimeWindow,
};
use ozon_client::OzonRestClient;

/// Ozon Seller analytics
#[derive(Parser)]
#[command(name = "seller-analytics", about = "Ozon seller order and finance summaries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Order counts and values.
    Orders {
        #[arg(long, value_enum, default_value_t = Period::Day)]
        period: Period,
        #[arg(long, value_enum, default_value_t = Scheme::Fbo)]
        scheme: Scheme,
    },
    /// Finance totals.
    Finance {
        #[arg(long, value_enum, default_value_t = Period::Day)]
        period: Period,
    },
    /// Finance totals plus FBO orders for the current month.
    Full,
    /// Seller account info.
    Account,
    /// Review ratings for the current month.
    Reviews,
}

#[derive(Debug, Clone, Copy, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
enum Period {
    Day,
    Month,
}

#[derive(Debug, Clone, Copy, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
enum Scheme {
    Fbo,
    Fbs,
    All,
}

#[derive(Serialize)]
struct OrdersReport {
    window: TimeWindow,
    scheme: Scheme,
    summary: AggregateSummary,
    statuses: BTreeMap<String, usize>,
}

#[derive(Serialize)]
struct FinanceReport {
    window: TimeWindow,
    totals: FinancialTotals,
}

#[derive(Serialize)]
struct MonthReport {
    window: TimeWindow,
    finance: FinancialTotals,
    orders: AggregateSummary,
}

#[derive(Serialize)]
struct ReviewsReport {
    window: TimeWindow,
    summary: ReviewSummary,
}

fn resolve_window(period: Period) -> TimeWindow {
    let now = Utc::now();
    match period {
        Period::Day => analytics::day_window(now),
        Period::Month => analytics::month_window(now),
    }
}

async fn fetch_postings(
    client: &OzonRestClient,
    window: &TimeWindow,
    scheme: Scheme,
) -> Result<Vec<Value>, Error> {
    match scheme {
        Scheme::Fbo => client.fbo_postings(window).await,
        Scheme::Fbs => client.fbs_postings(window).await,
        Scheme::All => {
            let mut postings = client.fbo_postings(window).await?;
            postings.extend(client.fbs_postings(window).await?);
            Ok(postings)
        }
    }
}

fn to_records(raw: &[Value]) -> Vec<OrderRecord> {
    raw.iter().filter_map(order_record).collect()
}

async fn run(
    client: &OzonRestClient,
    config: &BotConfig,
    command: Command,
) -> Result<Value, Error> {
    let report = match command {
        Command::Orders { period, scheme } => {
            let window = resolve_window(period);
            let records = to_records(&fetch_postings(client, &window, scheme).await?);
            let summary = analytics::summarize(&records);
            info!(
                "Orders {}: {} total, {} cancelled, avg check {:.2}",
                window.label, summary.total_count, summary.cancelled_count, summary.average_check
            );
            serde_json::to_value(OrdersReport {
                statuses: analytics::status_breakdown(&records),
                window,
                scheme,
                summary,
            })
        }
        Command::Finance { period } => {
            let window = resolve_window(period);
            let totals = analytics::compute_totals(&client.finance_totals(&window).await?);
            info!(
                "Finance {}: accrued {:.2}, profit {:.2}",
                window.label, totals.accrued, totals.profit
            );
            serde_json::to_value(FinanceReport { window, totals })
        }
        Command::Full => {
            let window = resolve_window(Period::Month);
            let finance = analytics::compute_totals(&client.finance_totals(&window).await?);
            let orders = analytics::summarize_values(&client.fbo_postings(&window).await?);
            serde_json::to_value(MonthReport {
                window,
                finance,
                orders,
            })
        }
        Command::Account => return client.seller_info().await,
        Command::Reviews => {
            let window = resolve_window(Period::Month);
            let raw = client.reviews(config.review_fetch_limit).await?;
            let summary = analytics::summarize_reviews(&raw, &window, config.recent_reviews);
            serde_json::to_value(ReviewsReport { window, summary })
        }
    };

    Ok(report?)
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "seller_analytics=info,ozon_client=info,analytics=info".into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let (cfg, credentials) = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let client = match OzonRestClient::new(&credentials, &cfg) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build Ozon client: {}", e);
            std::process::exit(1);
        }
    };

    match run(&client, &cfg, cli.command).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to render report: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) if e.is_upstream() => {
            match e.status() {
                Some(status) => error!("Ozon API rejected the request (HTTP {}): {}", status, e),
                None => error!("Request failed: {}", e),
            }
            std::process::exit(2);
        }
        Err(e) => {
            error!("Failed to build report: {}", e);
            std::process::exit(1);
        }
    }
}
