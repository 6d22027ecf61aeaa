use alerter::TelegramAlerter;
use clap::{Parser, Subcommand};
use configuration::Config;
use core_types::AssetId;
use correlation::CorrelationMatrix;
use futures::future::join_all;
use history_source::{
    load_price_series, CoinGeckoClient, FmpClient, MarketDataSource, MarketHistorySource,
};
use indicatif::{ProgressBar, ProgressStyle};
use publisher::{CloudStorageSink, MultiSink, PublishSink, SheetsSink};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// The main entry point for the marketdash dashboard engine.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load API keys and tokens from the .env file when running locally.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = configuration::load_config()?;

    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, "starting scheduled job");

    match cli.command {
        Commands::PullCoins => handle_pull_coins(&config).await?,
        Commands::PullStocks => handle_pull_stocks(&config).await?,
        Commands::Correlation => handle_correlation(&config).await?,
        Commands::Ath => handle_ath(&config).await?,
        Commands::Stablecoins => handle_stablecoins(&config).await?,
        Commands::Compare => handle_compare(&config).await?,
        Commands::Anomalies => handle_anomalies(&config).await?,
        Commands::Pages => {
            handle_correlation(&config).await?;
            handle_ath(&config).await?;
            handle_stablecoins(&config).await?;
            handle_compare(&config).await?;
            handle_anomalies(&config).await?;
        }
    }

    tracing::info!(%run_id, "scheduled job finished");
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Scheduled jobs that pull public market data and publish dashboard pages.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull raw coin histories from CoinGecko into the bucket.
    PullCoins,
    /// Pull raw stock histories from FMP into the bucket.
    PullStocks,
    /// Build and publish the cross-asset correlation matrices.
    Correlation,
    /// Build and publish the all-time-high drawdown page.
    Ath,
    /// Build and publish the stablecoin supply page.
    Stablecoins,
    /// Build and publish the time-history comparison page.
    Compare,
    /// Evaluate the anomaly rules, publish the status page, send alerts.
    Anomalies,
    /// Run every page job in sequence.
    Pages,
}

// ==============================================================================
// Shared wiring
// ==============================================================================

fn asset_ids(names: &[String]) -> Vec<AssetId> {
    names.iter().map(|name| AssetId::new(name.clone())).collect()
}

/// The full asset universe of the correlation page: coins, then stocks.
fn correlation_universe(config: &Config) -> Vec<AssetId> {
    let mut assets = asset_ids(&config.assets.coins);
    assets.extend(asset_ids(&config.assets.stocks));
    assets
}

fn market_source(config: &Config) -> MarketDataSource {
    MarketDataSource::new(
        CoinGeckoClient::new(&config.api.coingecko_base_url),
        FmpClient::new(&config.api.fmp_base_url, &config.api.fmp_api_key),
        &asset_ids(&config.assets.coins),
    )
}

/// The destination for derived pages: cloud storage, plus the spreadsheet
/// when one is configured.
fn page_sink(config: &Config) -> MultiSink {
    let mut sinks: Vec<Box<dyn PublishSink>> = vec![Box::new(CloudStorageSink::new(
        &config.storage.bucket,
        &config.storage.pages_prefix,
        &config.storage.access_token,
    ))];
    if !config.sheets.spreadsheet_id.is_empty() {
        sinks.push(Box::new(SheetsSink::new(
            &config.sheets.spreadsheet_id,
            &config.sheets.access_token,
        )));
    }
    MultiSink::new(sinks)
}

fn data_sink(config: &Config) -> CloudStorageSink {
    CloudStorageSink::new(
        &config.storage.bucket,
        &config.storage.data_prefix,
        &config.storage.access_token,
    )
}

fn pull_progress(len: usize) -> anyhow::Result<ProgressBar> {
    let progress = ProgressBar::new(len as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    Ok(progress)
}

// ==============================================================================
// Job handlers
// ==============================================================================

async fn handle_pull_coins(config: &Config) -> anyhow::Result<()> {
    let client = CoinGeckoClient::new(&config.api.coingecko_base_url);
    let sink = data_sink(config);
    let coins = asset_ids(&config.assets.coins);

    let progress = pull_progress(coins.len())?;

    // Fetch concurrently, publish in configured order.
    let fetches = join_all(coins.iter().map(|coin| client.fetch_market_history(coin))).await;
    for (coin, result) in coins.iter().zip(fetches) {
        progress.set_message(format!("Publishing {}...", coin));
        match result {
            Ok(history) => sink.publish(&pages::coin_history_table(&history)).await?,
            Err(e) => tracing::warn!(asset = %coin, error = %e, "skipping failed coin pull"),
        }
        progress.inc(1);
    }

    progress.finish_with_message("Coin pull complete!");
    Ok(())
}

async fn handle_pull_stocks(config: &Config) -> anyhow::Result<()> {
    let client = FmpClient::new(&config.api.fmp_base_url, &config.api.fmp_api_key);
    let sink = data_sink(config);
    let stocks = asset_ids(&config.assets.stocks);

    let progress = pull_progress(stocks.len())?;

    let fetches = join_all(
        stocks
            .iter()
            .map(|stock| load_price_series(&client, stock)),
    )
    .await;
    for (stock, result) in stocks.iter().zip(fetches) {
        progress.set_message(format!("Publishing {}...", stock));
        match result {
            Ok(series) => sink.publish(&pages::stock_history_table(&series)).await?,
            Err(e) => tracing::warn!(asset = %stock, error = %e, "skipping failed stock pull"),
        }
        progress.inc(1);
    }

    progress.finish_with_message("Stock pull complete!");
    Ok(())
}

async fn handle_correlation(config: &Config) -> anyhow::Result<()> {
    let source = market_source(config);
    let sink = page_sink(config);

    let matrices = pages::generate_correlation_page(
        &source,
        &sink,
        &correlation_universe(config),
        &config.correlation.lookback_days,
    )
    .await?;

    for matrix in &matrices {
        print_matrix(matrix);
    }
    Ok(())
}

async fn handle_ath(config: &Config) -> anyhow::Result<()> {
    let source = market_source(config);
    let sink = page_sink(config);

    pages::generate_ath_page(&source, &sink, &asset_ids(&config.assets.coins)).await?;
    Ok(())
}

async fn handle_stablecoins(config: &Config) -> anyhow::Result<()> {
    let client = CoinGeckoClient::new(&config.api.coingecko_base_url);
    let sink = page_sink(config);

    pages::generate_stablecoin_page(&client, &sink, &asset_ids(&config.assets.stablecoins))
        .await?;
    Ok(())
}

async fn handle_compare(config: &Config) -> anyhow::Result<()> {
    let source = market_source(config);
    let sink = page_sink(config);

    pages::generate_compare_page(&source, &sink, &asset_ids(&config.assets.coins)).await?;
    Ok(())
}

async fn handle_anomalies(config: &Config) -> anyhow::Result<()> {
    let source = market_source(config);
    let market = CoinGeckoClient::new(&config.api.coingecko_base_url);
    let sink = page_sink(config);
    let alerter = TelegramAlerter::new(&config.alerts.telegram);

    pages::generate_anomaly_page(
        &source,
        &market,
        &sink,
        alerter.as_ref(),
        &config.alerts.rules,
    )
    .await?;
    Ok(())
}

/// Renders one matrix on the console, mirroring what was just published.
fn print_matrix(matrix: &CorrelationMatrix) {
    println!(
        "Correlation matrix for: {} day lookback",
        matrix.lookback_days()
    );

    let mut table = comfy_table::Table::new();
    let mut header = vec![String::new()];
    header.extend(matrix.assets().iter().map(|a| a.to_string()));
    table.set_header(header);

    for (i, asset) in matrix.assets().iter().enumerate() {
        let mut row = vec![asset.to_string()];
        for j in 0..matrix.size() {
            row.push(
                matrix
                    .cell(i, j)
                    .map(|v| format!("{:.4}", v))
                    .unwrap_or_default(),
            );
        }
        table.add_row(row);
    }

    println!("{table}");
}
