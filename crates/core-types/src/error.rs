use crate::series::AssetId;
use chrono::NaiveDate;
use thiserror::Error;

/// A loaded price history is structurally unusable. Assets that produce a
/// `DataError` are excluded from the run rather than aborting the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("price history for '{0}' is empty")]
    EmptySeries(AssetId),

    #[error("price history for '{asset}' is not date-ordered: {next} follows {prev}")]
    NonMonotonicDates {
        asset: AssetId,
        prev: NaiveDate,
        next: NaiveDate,
    },
}
