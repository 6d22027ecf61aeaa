use crate::error::PageError;
use chrono::NaiveDate;
use core_types::AssetId;
use history_source::{CoinHistory, MarketHistorySource};
use publisher::{Cell, PublishSink, Table};
use std::collections::{HashMap, HashSet};

/// One coin's market state for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CoinDaily {
    pub price: f64,
    pub market_cap: f64,
    pub volume: f64,
    /// Circulating supply, market cap over price. `None` on a zero price.
    pub supply: Option<f64>,
    pub supply_change_24h: Option<f64>,
    pub volume_change_24h: Option<f64>,
}

/// Collapses a coin history to one row per calendar date (duplicates keep
/// the first-seen observation) and derives supply and the 24h changes.
pub(crate) fn daily_rows(history: &CoinHistory) -> Vec<(NaiveDate, CoinDaily)> {
    let mut seen = HashSet::new();
    let mut rows: Vec<(NaiveDate, CoinDaily)> = Vec::with_capacity(history.points.len());

    for point in &history.points {
        let date = point.timestamp.date_naive();
        if !seen.insert(date) {
            continue;
        }
        let supply = if point.price == 0.0 {
            None
        } else {
            Some(point.market_cap / point.price)
        };
        rows.push((
            date,
            CoinDaily {
                price: point.price,
                market_cap: point.market_cap,
                volume: point.volume,
                supply,
                supply_change_24h: None,
                volume_change_24h: None,
            },
        ));
    }

    for i in 1..rows.len() {
        let previous = rows[i - 1].1;
        rows[i].1.supply_change_24h = option_change(previous.supply, rows[i].1.supply);
        rows[i].1.volume_change_24h = change(previous.volume, rows[i].1.volume);
    }

    rows
}

/// The most recent day-over-day supply change, the metric the anomaly page
/// watches.
pub(crate) fn latest_supply_change(history: &CoinHistory) -> Option<f64> {
    daily_rows(history)
        .last()
        .and_then(|(_, daily)| daily.supply_change_24h)
}

fn change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous)
    }
}

fn option_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    match (previous, current) {
        (Some(p), Some(c)) => change(p, c),
        _ => None,
    }
}

/// Generates and publishes the stablecoin page: per-coin price, market cap,
/// volume, supply and 24h changes, left-joined onto the first loaded coin's
/// date axis, plus the aggregate stablecoin market cap and the SSR
/// (axis-coin market cap over total stablecoin market cap).
///
/// The first configured coin (bitcoin, in practice the longest-running
/// history) provides the date axis; coins that fail to load are excluded.
pub async fn generate_stablecoin_page(
    source: &dyn MarketHistorySource,
    sink: &dyn PublishSink,
    coins: &[AssetId],
) -> Result<Table, PageError> {
    let mut histories: Vec<(AssetId, Vec<(NaiveDate, CoinDaily)>)> = Vec::new();
    for coin in coins {
        match source.fetch_market_history(coin).await {
            Ok(history) => histories.push((coin.clone(), daily_rows(&history))),
            Err(e) => {
                tracing::warn!(asset = %coin, error = %e, "excluding coin from stablecoin page");
            }
        }
    }

    let mut columns = Vec::new();
    for (coin, _) in &histories {
        for suffix in [
            "price",
            "mc",
            "vol",
            "supply",
            "supply-24h-change",
            "vol-24h-change",
        ] {
            columns.push(format!("{}-{}", coin, suffix));
        }
    }
    columns.push("total-stablecoin-mc".to_string());
    columns.push("ssr".to_string());

    let mut table = Table::new("marketdash-stablecoin-24h-history", columns);

    if let Some((_, axis_rows)) = histories.first() {
        let lookups: Vec<HashMap<NaiveDate, CoinDaily>> = histories
            .iter()
            .map(|(_, rows)| rows.iter().copied().collect())
            .collect();

        for &(date, axis_daily) in axis_rows {
            let mut cells = Vec::with_capacity(table.columns().len());

            // Total stablecoin market cap covers every non-axis coin; a coin
            // with no observation for the date makes the total undefined,
            // matching the dashboard's historical NaN propagation.
            let mut total_stablecoin_mc = Some(0.0);

            for (i, lookup) in lookups.iter().enumerate() {
                match lookup.get(&date) {
                    Some(daily) => {
                        cells.push(Cell::Float(daily.price));
                        cells.push(Cell::Float(daily.market_cap));
                        cells.push(Cell::Float(daily.volume));
                        cells.push(Cell::from(daily.supply));
                        cells.push(Cell::from(daily.supply_change_24h));
                        cells.push(Cell::from(daily.volume_change_24h));
                        if i > 0 {
                            total_stablecoin_mc =
                                total_stablecoin_mc.map(|total| total + daily.market_cap);
                        }
                    }
                    None => {
                        cells.extend((0..6).map(|_| Cell::Empty));
                        if i > 0 {
                            total_stablecoin_mc = None;
                        }
                    }
                }
            }

            let ssr = match total_stablecoin_mc {
                Some(total) if total != 0.0 => Some(axis_daily.market_cap / total),
                _ => None,
            };
            cells.push(Cell::from(total_stablecoin_mc));
            cells.push(Cell::from(ssr));

            table.push_row(date.to_string(), cells);
        }
    }

    sink.publish(&table).await?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{coin_history, CollectingSink, MapMarketSource};

    #[test]
    fn supply_and_changes_derive_from_market_cap_and_price() {
        let history = coin_history(
            "tether",
            &[
                (1, 1.0, 1000.0, 50.0),
                (2, 1.0, 1100.0, 100.0),
                (2, 1.0, 9999.0, 999.0), // same-day duplicate is dropped
            ],
        );

        let rows = daily_rows(&history);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1.supply, Some(1000.0));
        assert_eq!(rows[1].1.supply, Some(1100.0));
        assert!((rows[1].1.supply_change_24h.unwrap() - 0.1).abs() < 1e-12);
        assert!((rows[1].1.volume_change_24h.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(latest_supply_change(&history), rows[1].1.supply_change_24h);
    }

    #[test]
    fn zero_price_makes_supply_undefined() {
        let history = coin_history("dust", &[(1, 0.0, 1000.0, 50.0)]);
        assert_eq!(daily_rows(&history)[0].1.supply, None);
    }

    #[tokio::test]
    async fn page_joins_on_the_axis_coin_and_computes_ssr() {
        let source = MapMarketSource::new()
            .with(coin_history(
                "bitcoin",
                &[(1, 100.0, 10_000.0, 1.0), (2, 110.0, 11_000.0, 1.0)],
            ))
            .with(coin_history("tether", &[(2, 1.0, 5_500.0, 1.0)]));
        let sink = CollectingSink::new();

        let table = generate_stablecoin_page(
            &source,
            &sink,
            &[AssetId::from("bitcoin"), AssetId::from("tether")],
        )
        .await
        .unwrap();

        assert_eq!(table.rows().len(), 2);
        let ssr_col = table
            .columns()
            .iter()
            .position(|c| c == "ssr")
            .unwrap();
        let total_col = ssr_col - 1;

        // Day 1: tether has no observation, so the total and SSR are empty.
        assert_eq!(table.rows()[0].cells[total_col], Cell::Empty);
        assert_eq!(table.rows()[0].cells[ssr_col], Cell::Empty);

        // Day 2: total = 5500, ssr = 11000 / 5500 = 2.
        assert_eq!(table.rows()[1].cells[total_col], Cell::Float(5_500.0));
        assert_eq!(table.rows()[1].cells[ssr_col], Cell::Float(2.0));
    }

    #[tokio::test]
    async fn failed_axis_coin_falls_back_to_next_loaded_coin() {
        let source =
            MapMarketSource::new().with(coin_history("tether", &[(1, 1.0, 1000.0, 1.0)]));
        let sink = CollectingSink::new();

        let table = generate_stablecoin_page(
            &source,
            &sink,
            &[AssetId::from("bitcoin"), AssetId::from("tether")],
        )
        .await
        .unwrap();

        // Bitcoin failed to load, so tether provides the axis.
        assert_eq!(table.rows().len(), 1);
        assert!(table.columns().iter().any(|c| c == "tether-price"));
        assert!(!table.columns().iter().any(|c| c == "bitcoin-price"));
    }
}
