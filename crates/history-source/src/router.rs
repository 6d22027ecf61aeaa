use crate::coingecko::CoinGeckoClient;
use crate::error::SourceError;
use crate::fmp::FmpClient;
use crate::HistorySource;
use async_trait::async_trait;
use core_types::{AssetId, PricePoint};
use std::collections::HashSet;

/// Routes a mixed asset universe to the right upstream: configured coin ids
/// go to CoinGecko, everything else to FMP. The page pipelines only ever
/// see one `HistorySource`.
pub struct MarketDataSource {
    coingecko: CoinGeckoClient,
    fmp: FmpClient,
    coins: HashSet<AssetId>,
}

impl MarketDataSource {
    pub fn new(coingecko: CoinGeckoClient, fmp: FmpClient, coins: &[AssetId]) -> Self {
        Self {
            coingecko,
            fmp,
            coins: coins.iter().cloned().collect(),
        }
    }
}

#[async_trait]
impl HistorySource for MarketDataSource {
    async fn fetch_price_history(&self, asset: &AssetId) -> Result<Vec<PricePoint>, SourceError> {
        if self.coins.contains(asset) {
            self.coingecko.fetch_price_history(asset).await
        } else {
            self.fmp.fetch_price_history(asset).await
        }
    }
}
