use chrono::{DateTime, NaiveDate, Utc};
use core_types::AssetId;
use serde::Deserialize;

/// One `[unix_millis, value]` pair as CoinGecko serializes every series.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawPoint(pub i64, pub f64);

/// The CoinGecko `market_chart` payload: three parallel series keyed by
/// millisecond timestamps.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<RawPoint>,
    pub market_caps: Vec<RawPoint>,
    pub total_volumes: Vec<RawPoint>,
}

/// One daily bar from the FMP `historical-price-full` payload. The feed
/// carries OHLC and volume; only the close survives into the core.
#[derive(Debug, Clone, Deserialize)]
pub struct FmpBar {
    pub date: NaiveDate,
    pub close: f64,
}

/// The FMP `historical-price-full` payload. An unknown symbol comes back as
/// an empty object, hence the default.
#[derive(Debug, Clone, Deserialize)]
pub struct FmpHistoryResponse {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub historical: Vec<FmpBar>,
}

/// One observation of a coin's full market state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinHistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub market_cap: f64,
    pub volume: f64,
}

/// A coin's price, market-cap and volume history, ascending in time. One
/// calendar date can appear more than once (the trailing partial day);
/// consumers deduplicate keep-first at day granularity.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinHistory {
    pub asset: AssetId,
    pub points: Vec<CoinHistoryPoint>,
}
