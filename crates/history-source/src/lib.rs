use async_trait::async_trait;
use core_types::{AssetId, PricePoint};

pub mod coingecko;
pub mod error;
pub mod fmp;
pub mod loader;
pub mod responses;
pub mod router;

// --- Public API ---
pub use coingecko::CoinGeckoClient;
pub use error::{LoadError, SourceError};
pub use fmp::FmpClient;
pub use loader::load_price_series;
pub use responses::{CoinHistory, CoinHistoryPoint};
pub use router::MarketDataSource;

/// The generic, abstract interface for a daily price-history provider.
/// This trait is the contract the page pipelines use, allowing the
/// underlying implementation (live or test double) to be swapped out.
///
/// Dates are calendar dates (day granularity); prices are non-negative and
/// quoted in one consistent currency per asset. A provider reports failure
/// as a `SourceError`, never as a silently empty series.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_price_history(
        &self,
        asset: &AssetId,
    ) -> Result<Vec<PricePoint>, error::SourceError>;
}

/// Providers that also carry market-cap and volume series per coin, needed
/// by the stablecoin page and the raw-history pull job.
#[async_trait]
pub trait MarketHistorySource: Send + Sync {
    async fn fetch_market_history(
        &self,
        asset: &AssetId,
    ) -> Result<responses::CoinHistory, error::SourceError>;
}
