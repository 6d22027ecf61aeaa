use crate::error::PageError;
use core_types::{AssetId, PriceSeries};
use history_source::{load_price_series, HistorySource};
use publisher::{Cell, PublishSink, Table};

/// Fractional drawdown from the all-time high over the full daily history,
/// rounded to three decimals at each step the way the dashboard has always
/// displayed it. `None` when the history never traded above zero.
pub fn percent_drawdown(series: &PriceSeries) -> Option<f64> {
    let current = series.points().last()?.price;
    let ath = series
        .points()
        .iter()
        .map(|p| p.price)
        .fold(f64::NEG_INFINITY, f64::max);
    if ath <= 0.0 {
        return None;
    }
    Some(round3(1.0 - round3(current / ath)))
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Generates and publishes the all-time-high drawdown page: one column per
/// asset, a single `percent_drawdown` row.
pub async fn generate_ath_page(
    source: &dyn HistorySource,
    sink: &dyn PublishSink,
    assets: &[AssetId],
) -> Result<Table, PageError> {
    let mut columns = Vec::with_capacity(assets.len());
    let mut cells = Vec::with_capacity(assets.len());

    for asset in assets {
        match load_price_series(source, asset).await {
            Ok(series) => {
                columns.push(asset.to_string());
                cells.push(Cell::from(percent_drawdown(&series)));
            }
            Err(e) => {
                tracing::warn!(%asset, error = %e, "excluding asset from ath page");
            }
        }
    }

    let mut table = Table::new("marketdash-crypto-ath-percent-drawdown", columns);
    table.push_row("percent_drawdown", cells);

    sink.publish(&table).await?;
    Ok(table)
}
