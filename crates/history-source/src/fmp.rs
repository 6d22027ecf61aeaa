use crate::error::SourceError;
use crate::responses::FmpHistoryResponse;
use crate::HistorySource;
use async_trait::async_trait;
use core_types::{AssetId, PricePoint};

/// A client for the Financial Modeling Prep API, which serves the stock,
/// index, and commodity histories. Authenticated by a plain query-string
/// API key.
#[derive(Clone)]
pub struct FmpClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FmpClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl HistorySource for FmpClient {
    async fn fetch_price_history(&self, asset: &AssetId) -> Result<Vec<PricePoint>, SourceError> {
        tracing::debug!(%asset, "pulling stock history from fmp");
        let url = format!("{}/historical-price-full/{}", self.base_url, asset);

        let response = self
            .client
            .get(&url)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::Status {
                asset: asset.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let payload = serde_json::from_str::<FmpHistoryResponse>(&text).map_err(|e| {
            SourceError::Deserialization {
                asset: asset.to_string(),
                message: e.to_string(),
            }
        })?;

        // An unknown symbol comes back as `{}` rather than an error status.
        if payload.historical.is_empty() {
            return Err(SourceError::MissingAsset(asset.to_string()));
        }

        // The feed is newest-first; the interface contract is ascending.
        let mut observations: Vec<PricePoint> = payload
            .historical
            .iter()
            .map(|bar| PricePoint::new(bar.date, bar.close))
            .collect();
        observations.sort_by_key(|obs| obs.date);

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn history_payload_deserializes_and_sorts_ascending() {
        let payload = r#"{
            "symbol": "AAPL",
            "historical": [
                {"date": "2022-06-08", "open": 147.0, "close": 147.96, "volume": 53950200},
                {"date": "2022-06-07", "open": 144.2, "close": 148.71, "volume": 67808200}
            ]
        }"#;

        let parsed: FmpHistoryResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.symbol, "AAPL");
        assert_eq!(parsed.historical.len(), 2);
        assert_eq!(
            parsed.historical[1].date,
            NaiveDate::from_ymd_opt(2022, 6, 7).unwrap()
        );

        let mut observations: Vec<PricePoint> = parsed
            .historical
            .iter()
            .map(|bar| PricePoint::new(bar.date, bar.close))
            .collect();
        observations.sort_by_key(|obs| obs.date);
        assert!(observations[0].date < observations[1].date);
    }

    #[test]
    fn unknown_symbol_payload_is_empty() {
        let parsed: FmpHistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.historical.is_empty());
    }
}
