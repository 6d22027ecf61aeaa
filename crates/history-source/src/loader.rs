use crate::error::LoadError;
use crate::HistorySource;
use core_types::{AssetId, PriceSeries};

/// Fetches and shapes one asset's daily closing-price history: one
/// observation per calendar date (duplicates keep the first-seen value),
/// ascending, never empty.
///
/// This is the per-asset isolation boundary: callers match on the result,
/// log the error, and exclude the asset from the run without aborting the
/// batch. There is no retry here; the next scheduled run is the retry.
pub async fn load_price_series(
    source: &dyn HistorySource,
    asset: &AssetId,
) -> Result<PriceSeries, LoadError> {
    let observations = source.fetch_price_history(asset).await?;
    let series = PriceSeries::from_observations(asset.clone(), observations)?;
    Ok(series)
}
