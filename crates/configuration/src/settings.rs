use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub assets: AssetsConfig,
    pub correlation: CorrelationConfig,
    pub storage: StorageConfig,
    pub sheets: SheetsConfig,
    pub alerts: AlertsConfig,
}

/// Endpoints and credentials for the upstream market-data APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub coingecko_base_url: String,
    pub fmp_base_url: String,
    /// Supplied via MARKETDASH__API__FMP_API_KEY in deployment.
    #[serde(default)]
    pub fmp_api_key: String,
}

/// The asset universe for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    /// CoinGecko coin ids (e.g. "bitcoin").
    pub coins: Vec<String>,
    /// FMP tickers: stocks, indices, and commodities (e.g. "AAPL", "^GSPC").
    pub stocks: Vec<String>,
    /// CoinGecko ids for the stablecoin page. The first entry is the date
    /// axis that every other history is joined onto.
    pub stablecoins: Vec<String>,
}

/// Parameters for the correlation page.
#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationConfig {
    /// Rolling lookback window sizes, in days (e.g. [7, 30, 90, 365]).
    pub lookback_days: Vec<u32>,
}

/// The object-storage destination for published pages.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub bucket: String,
    /// Object prefix for derived dashboard pages.
    pub pages_prefix: String,
    /// Object prefix for raw pulled histories.
    pub data_prefix: String,
    /// Bearer token, supplied via MARKETDASH__STORAGE__ACCESS_TOKEN.
    #[serde(default)]
    pub access_token: String,
}

/// The spreadsheet destination. An empty `spreadsheet_id` disables it.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Bearer token, supplied via MARKETDASH__SHEETS__ACCESS_TOKEN.
    #[serde(default)]
    pub access_token: String,
}

/// Threshold rules and the notification channel for the anomaly page.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub rules: Vec<AnomalyRule>,
}

/// Telegram bot credentials. Empty fields disable alerting gracefully.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub chat_id: String,
}

/// One threshold comparison evaluated by the anomaly page.
#[derive(Debug, Clone, Deserialize)]
pub struct AnomalyRule {
    pub name: String,
    pub metric: MetricKind,
    /// The asset the metric is computed for.
    pub asset: String,
    pub threshold: f64,
    pub description: String,
}

/// The metrics an anomaly rule can watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Fractional drawdown from the all-time high.
    AthDrawdown,
    /// Day-over-day change in circulating supply.
    SupplyChange24h,
}

impl Config {
    /// Rejects configurations that would make a run meaningless rather than
    /// letting them surface as empty pages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.correlation.lookback_days.is_empty() {
            return Err(ConfigError::ValidationError(
                "correlation.lookback_days must not be empty".to_string(),
            ));
        }
        if self.correlation.lookback_days.contains(&0) {
            return Err(ConfigError::ValidationError(
                "correlation.lookback_days entries must be positive".to_string(),
            ));
        }
        if self.assets.coins.is_empty() && self.assets.stocks.is_empty() {
            return Err(ConfigError::ValidationError(
                "assets.coins and assets.stocks must not both be empty".to_string(),
            ));
        }
        if self.storage.bucket.is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.bucket must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            api: ApiConfig {
                coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
                fmp_base_url: "https://financialmodelingprep.com/api/v3".to_string(),
                fmp_api_key: String::new(),
            },
            assets: AssetsConfig {
                coins: vec!["bitcoin".to_string()],
                stocks: vec!["AAPL".to_string()],
                stablecoins: vec!["bitcoin".to_string(), "tether".to_string()],
            },
            correlation: CorrelationConfig {
                lookback_days: vec![7, 30],
            },
            storage: StorageConfig {
                bucket: "dash-bucket".to_string(),
                pages_prefix: "pages".to_string(),
                data_prefix: "data".to_string(),
                access_token: String::new(),
            },
            sheets: SheetsConfig {
                spreadsheet_id: String::new(),
                access_token: String::new(),
            },
            alerts: AlertsConfig {
                telegram: TelegramConfig {
                    token: String::new(),
                    chat_id: String::new(),
                },
                rules: vec![],
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn empty_lookbacks_are_rejected() {
        let mut config = base_config();
        config.correlation.lookback_days.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_lookback_is_rejected() {
        let mut config = base_config();
        config.correlation.lookback_days.push(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_asset_universe_is_rejected() {
        let mut config = base_config();
        config.assets.coins.clear();
        config.assets.stocks.clear();
        assert!(config.validate().is_err());
    }
}
