use crate::error::PageError;
use chrono::NaiveDate;
use core_types::{AssetId, PriceSeries};
use history_source::{load_price_series, HistorySource};
use publisher::{Cell, PublishSink, Table};
use std::collections::HashMap;

/// Generates and publishes the time-history comparison page: one column of
/// daily closing prices per asset, left-joined onto the first loaded
/// asset's date axis so the front end can plot everything on one x-axis.
/// Dates an asset never traded stay empty.
pub async fn generate_compare_page(
    source: &dyn HistorySource,
    sink: &dyn PublishSink,
    assets: &[AssetId],
) -> Result<Table, PageError> {
    let mut loaded: Vec<(AssetId, PriceSeries)> = Vec::with_capacity(assets.len());
    for asset in assets {
        match load_price_series(source, asset).await {
            Ok(series) => loaded.push((asset.clone(), series)),
            Err(e) => {
                tracing::warn!(%asset, error = %e, "excluding asset from comparison page");
            }
        }
    }

    let columns: Vec<String> = loaded.iter().map(|(asset, _)| asset.to_string()).collect();
    let mut table = Table::new("marketdash-compare-time-history", columns);

    if let Some((_, axis_series)) = loaded.first() {
        let lookups: Vec<HashMap<NaiveDate, f64>> = loaded
            .iter()
            .map(|(_, series)| {
                series
                    .points()
                    .iter()
                    .map(|p| (p.date, p.price))
                    .collect()
            })
            .collect();

        for point in axis_series.points() {
            let cells = lookups
                .iter()
                .map(|lookup| Cell::from(lookup.get(&point.date).copied()))
                .collect();
            table.push_row(point.date.to_string(), cells);
        }
    }

    sink.publish(&table).await?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CollectingSink, MapSource};
    use core_types::PricePoint;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 6, d).unwrap()
    }

    #[tokio::test]
    async fn prices_join_onto_the_first_asset_axis() {
        let source = MapSource::new()
            .with(
                "bitcoin",
                vec![
                    PricePoint::new(day(1), 100.0),
                    PricePoint::new(day(2), 110.0),
                    PricePoint::new(day(3), 120.0),
                ],
            )
            .with(
                "ethereum",
                vec![
                    PricePoint::new(day(2), 10.0),
                    PricePoint::new(day(3), 11.0),
                    PricePoint::new(day(4), 12.0),
                ],
            );
        let sink = CollectingSink::new();

        let table = generate_compare_page(
            &source,
            &sink,
            &[AssetId::from("bitcoin"), AssetId::from("ethereum")],
        )
        .await
        .unwrap();

        assert_eq!(table.columns(), ["bitcoin", "ethereum"]);
        // Axis follows bitcoin: days 1-3; ethereum's day 4 is dropped.
        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.rows()[0].label, "2022-06-01");
        assert_eq!(table.rows()[0].cells[1], Cell::Empty);
        assert_eq!(table.rows()[1].cells[1], Cell::Float(10.0));
    }
}
