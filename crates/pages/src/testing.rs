//! Shared trait doubles for the page-pipeline tests.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use core_types::{AssetId, PricePoint};
use history_source::{
    CoinHistory, CoinHistoryPoint, HistorySource, MarketHistorySource, SourceError,
};
use publisher::{PublishError, PublishSink, Table};
use std::collections::HashMap;
use std::sync::Mutex;

/// Deterministic synthetic daily price walk, distinct per seed.
pub fn walk(seed: u64, days: usize) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    let mut price = 100.0 + seed as f64;
    let mut state = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    let mut points = Vec::with_capacity(days);
    for i in 0..days {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let step = ((state >> 33) as f64 / (1u64 << 31) as f64) - 1.0;
        price *= 1.0 + step * 0.02;
        points.push(PricePoint::new(start + chrono::Days::new(i as u64), price));
    }
    points
}

/// In-memory history source backed by a map; unknown assets fail the way a
/// live source reports a missing asset.
#[derive(Default)]
pub struct MapSource {
    histories: HashMap<AssetId, Vec<PricePoint>>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, asset: &str, observations: Vec<PricePoint>) -> Self {
        self.histories.insert(AssetId::from(asset), observations);
        self
    }
}

#[async_trait]
impl HistorySource for MapSource {
    async fn fetch_price_history(&self, asset: &AssetId) -> Result<Vec<PricePoint>, SourceError> {
        self.histories
            .get(asset)
            .cloned()
            .ok_or_else(|| SourceError::MissingAsset(asset.to_string()))
    }
}

/// In-memory market-history source for the stablecoin and anomaly pages.
#[derive(Default)]
pub struct MapMarketSource {
    histories: HashMap<AssetId, CoinHistory>,
}

impl MapMarketSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, history: CoinHistory) -> Self {
        self.histories.insert(history.asset.clone(), history);
        self
    }
}

#[async_trait]
impl MarketHistorySource for MapMarketSource {
    async fn fetch_market_history(&self, asset: &AssetId) -> Result<CoinHistory, SourceError> {
        self.histories
            .get(asset)
            .cloned()
            .ok_or_else(|| SourceError::MissingAsset(asset.to_string()))
    }
}

/// Builds a daily coin history from `(day, price, market_cap, volume)` rows.
pub fn coin_history(asset: &str, rows: &[(u32, f64, f64, f64)]) -> CoinHistory {
    let points = rows
        .iter()
        .map(|&(day, price, market_cap, volume)| CoinHistoryPoint {
            timestamp: Utc.with_ymd_and_hms(2022, 6, day, 0, 0, 0).unwrap(),
            price,
            market_cap,
            volume,
        })
        .collect();
    CoinHistory {
        asset: AssetId::from(asset),
        points,
    }
}

/// Publishing sink that records every table it is handed.
#[derive(Default)]
pub struct CollectingSink {
    tables: Mutex<Vec<Table>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> Vec<Table> {
        self.tables.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishSink for CollectingSink {
    async fn publish(&self, table: &Table) -> Result<(), PublishError> {
        self.tables.lock().unwrap().push(table.clone());
        Ok(())
    }
}

/// A sink that rejects everything, for fatal-publish tests.
pub struct FailingSink;

#[async_trait]
impl PublishSink for FailingSink {
    async fn publish(&self, table: &Table) -> Result<(), PublishError> {
        Err(PublishError::Rejected {
            table: table.name().to_string(),
            status: 500,
            body: "rejected by test sink".to_string(),
        })
    }
}
