use crate::error::DataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifies one asset within a run: a coin id such as `bitcoin` or a
/// ticker such as `AAPL` or `^GSPC`. Identifiers are unique per run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single daily closing-price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// A daily closing-price history for one asset: strictly ascending in date,
/// at most one observation per calendar date, never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    asset: AssetId,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from raw observations in feed order.
    ///
    /// Duplicate calendar dates keep the first-seen value; this mirrors the
    /// upstream feeds, where the trailing observation of the current day
    /// repeats the date of the last full day. An empty feed or one whose
    /// dates are out of order after deduplication yields a `DataError` so
    /// the caller sees the failure instead of an empty downstream result.
    pub fn from_observations(
        asset: AssetId,
        observations: Vec<PricePoint>,
    ) -> Result<Self, DataError> {
        let mut seen = HashSet::new();
        let mut points = Vec::with_capacity(observations.len());
        for obs in observations {
            if seen.insert(obs.date) {
                points.push(obs);
            }
        }

        if points.is_empty() {
            return Err(DataError::EmptySeries(asset));
        }
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(DataError::NonMonotonicDates {
                    asset,
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }

        Ok(Self { asset, points })
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
