use crate::error::SourceError;
use crate::responses::{CoinHistory, CoinHistoryPoint, MarketChartResponse, RawPoint};
use crate::{HistorySource, MarketHistorySource};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use core_types::{AssetId, PricePoint};
use std::collections::BTreeMap;

/// A client for the public CoinGecko API. No authentication is required;
/// the free tier is enough for a daily batch pull.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn fetch_market_chart(&self, asset: &AssetId) -> Result<MarketChartResponse, SourceError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, asset);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("days", "max"),
                ("interval", "daily"),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::MissingAsset(asset.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                asset: asset.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str::<MarketChartResponse>(&text).map_err(|e| {
            SourceError::Deserialization {
                asset: asset.to_string(),
                message: e.to_string(),
            }
        })
    }
}

/// Inner-joins the three parallel series on their millisecond timestamps;
/// a timestamp missing from any one of them is dropped.
pub(crate) fn merge_market_chart(
    asset: &AssetId,
    chart: &MarketChartResponse,
) -> Result<CoinHistory, SourceError> {
    let caps: BTreeMap<i64, f64> = chart.market_caps.iter().map(|p| (p.0, p.1)).collect();
    let volumes: BTreeMap<i64, f64> = chart.total_volumes.iter().map(|p| (p.0, p.1)).collect();

    let mut points = Vec::with_capacity(chart.prices.len());
    for &RawPoint(millis, price) in &chart.prices {
        let (Some(&market_cap), Some(&volume)) = (caps.get(&millis), volumes.get(&millis)) else {
            continue;
        };
        let timestamp = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            SourceError::Deserialization {
                asset: asset.to_string(),
                message: format!("invalid timestamp: {}", millis),
            }
        })?;
        points.push(CoinHistoryPoint {
            timestamp,
            price,
            market_cap,
            volume,
        });
    }

    if points.is_empty() {
        return Err(SourceError::MissingAsset(asset.to_string()));
    }

    Ok(CoinHistory {
        asset: asset.clone(),
        points,
    })
}

#[async_trait]
impl HistorySource for CoinGeckoClient {
    async fn fetch_price_history(&self, asset: &AssetId) -> Result<Vec<PricePoint>, SourceError> {
        let history = self.fetch_market_history(asset).await?;
        Ok(history
            .points
            .iter()
            .map(|p| PricePoint::new(p.timestamp.date_naive(), p.price))
            .collect())
    }
}

#[async_trait]
impl MarketHistorySource for CoinGeckoClient {
    async fn fetch_market_history(&self, asset: &AssetId) -> Result<CoinHistory, SourceError> {
        tracing::debug!(%asset, "pulling coin history from coingecko");
        let chart = self.fetch_market_chart(asset).await?;
        merge_market_chart(asset, &chart)
    }
}
