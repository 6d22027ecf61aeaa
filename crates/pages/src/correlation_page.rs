use crate::error::PageError;
use core_types::AssetId;
use correlation::{CorrelationEngine, CorrelationMatrix, ReturnSeries};
use history_source::{load_price_series, HistorySource};
use publisher::{Cell, PublishSink, Table};
use std::collections::HashMap;

/// Generates and publishes the cross-asset correlation page.
///
/// The whole pipeline runs sequentially in one invocation: load every
/// asset, derive its return series, build one matrix per lookback window,
/// publish one table per matrix. An asset whose history cannot be loaded is
/// logged and excluded from every matrix; it never aborts the batch.
///
/// # Returns
///
/// The computed matrices (in lookback order), so the caller can render them
/// on the console after publishing.
pub async fn generate_correlation_page(
    source: &dyn HistorySource,
    sink: &dyn PublishSink,
    assets: &[AssetId],
    lookback_days: &[u32],
) -> Result<Vec<CorrelationMatrix>, PageError> {
    // 1. Load every asset and derive its daily rate-of-return series.
    let mut loaded = Vec::with_capacity(assets.len());
    let mut returns: HashMap<AssetId, ReturnSeries> = HashMap::with_capacity(assets.len());
    for asset in assets {
        match load_price_series(source, asset).await {
            Ok(series) => {
                returns.insert(asset.clone(), ReturnSeries::from_prices(&series));
                loaded.push(asset.clone());
            }
            Err(e) => {
                tracing::warn!(%asset, error = %e, "excluding asset from correlation run");
            }
        }
    }

    // 2. One matrix per lookback window over every ordered pair.
    let matrices = CorrelationEngine::new().build_matrices(&loaded, &returns, lookback_days);

    // 3. Publish each matrix under a window-specific name.
    for matrix in &matrices {
        sink.publish(&matrix_table(matrix)).await?;
    }

    Ok(matrices)
}

/// Serializes one correlation matrix into the sink's table format, the
/// window size embedded in the name. Undefined coefficients stay empty.
pub fn matrix_table(matrix: &CorrelationMatrix) -> Table {
    let columns: Vec<String> = matrix.assets().iter().map(|a| a.to_string()).collect();
    let mut table = Table::new(
        format!("marketdash-correlation-matrix-{}day", matrix.lookback_days()),
        columns,
    );

    for (i, asset) in matrix.assets().iter().enumerate() {
        let cells = (0..matrix.size())
            .map(|j| Cell::from(matrix.cell(i, j)))
            .collect();
        table.push_row(asset.to_string(), cells);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{walk, CollectingSink, MapSource};
    use publisher::Cell;

    fn assets(names: &[&str]) -> Vec<AssetId> {
        names.iter().map(|n| AssetId::from(*n)).collect()
    }

    #[tokio::test]
    async fn end_to_end_three_assets_four_lookbacks() {
        let source = MapSource::new()
            .with("a", walk(1, 400))
            .with("b", walk(2, 400))
            .with("c", walk(3, 400));
        let sink = CollectingSink::new();

        let matrices = generate_correlation_page(
            &source,
            &sink,
            &assets(&["a", "b", "c"]),
            &[7, 30, 90, 365],
        )
        .await
        .unwrap();

        assert_eq!(matrices.len(), 4);
        let tables = sink.tables();
        assert_eq!(tables.len(), 4);
        assert_eq!(tables[0].name(), "marketdash-correlation-matrix-7day");
        assert_eq!(tables[3].name(), "marketdash-correlation-matrix-365day");

        for table in &tables {
            assert_eq!(table.columns().len(), 3);
            assert_eq!(table.rows().len(), 3);
            for (i, row) in table.rows().iter().enumerate() {
                assert_eq!(row.cells[i], Cell::Float(1.0));
            }
        }
    }

    #[tokio::test]
    async fn failed_asset_is_absent_everywhere_and_does_not_abort() {
        let source = MapSource::new()
            .with("a", walk(1, 100))
            .with("c", walk(3, 100));
        let sink = CollectingSink::new();

        let matrices = generate_correlation_page(
            &source,
            &sink,
            &assets(&["a", "broken", "c"]),
            &[30],
        )
        .await
        .unwrap();

        let matrix = &matrices[0];
        assert_eq!(matrix.size(), 2);
        assert!(!matrix.contains(&AssetId::from("broken")));
        assert!(matrix
            .get(&AssetId::from("a"), &AssetId::from("c"))
            .is_some());

        let tables = sink.tables();
        assert!(!tables[0].columns().contains(&"broken".to_string()));
    }

    #[tokio::test]
    async fn publish_failure_is_fatal_for_the_run() {
        let source = MapSource::new().with("a", walk(1, 50)).with("b", walk(2, 50));

        let result = generate_correlation_page(
            &source,
            &crate::testing::FailingSink,
            &assets(&["a", "b"]),
            &[7],
        )
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rerunning_with_shuffled_assets_reproduces_cell_values() {
        let source = MapSource::new()
            .with("a", walk(1, 400))
            .with("b", walk(2, 400))
            .with("c", walk(3, 400));

        let first = generate_correlation_page(
            &source,
            &CollectingSink::new(),
            &assets(&["a", "b", "c"]),
            &[7, 30, 90, 365],
        )
        .await
        .unwrap();
        let second = generate_correlation_page(
            &source,
            &CollectingSink::new(),
            &assets(&["c", "b", "a"]),
            &[7, 30, 90, 365],
        )
        .await
        .unwrap();

        for (m1, m2) in first.iter().zip(&second) {
            for a in m1.assets() {
                for b in m1.assets() {
                    match (m1.get(a, b), m2.get(a, b)) {
                        (Some(v1), Some(v2)) => assert!((v1 - v2).abs() < 1e-9),
                        (c1, c2) => assert_eq!(c1, c2),
                    }
                }
            }
        }
    }
}
