use chrono::NaiveDate;
use core_types::{AssetId, PriceSeries};
use serde::{Deserialize, Serialize};

/// One day's rate of return. `ret` is `None` where no return exists: the
/// first observation of a series, or a day whose previous close was zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub ret: Option<f64>,
}

/// The day-over-day rate-of-return series derived from one asset's price
/// history: `(price[i] - price[i-1]) / price[i-1]`, same length as the
/// source series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    asset: AssetId,
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    /// Derives the return series from a price history.
    ///
    /// Undefined returns are carried as `None` rather than raising: the
    /// aligner drops them before any coefficient is computed. A zero
    /// previous close marks the day unusable instead of dividing by zero.
    pub fn from_prices(prices: &PriceSeries) -> Self {
        let source = prices.points();
        let mut points = Vec::with_capacity(source.len());

        for (i, point) in source.iter().enumerate() {
            let ret = if i == 0 {
                None
            } else {
                let previous_close = source[i - 1].price;
                if previous_close == 0.0 {
                    None
                } else {
                    Some((point.price - previous_close) / previous_close)
                }
            };
            points.push(ReturnPoint {
                date: point.date,
                ret,
            });
        }

        Self {
            asset: prices.asset().clone(),
            points,
        }
    }

    /// Wraps already-derived return points, date-ascending.
    pub fn from_points(asset: AssetId, points: Vec<ReturnPoint>) -> Self {
        Self { asset, points }
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::PricePoint;

    fn series(prices: &[f64]) -> PriceSeries {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| {
                PricePoint::new(
                    NaiveDate::from_ymd_opt(2022, 6, 1 + i as u32).unwrap(),
                    price,
                )
            })
            .collect();
        PriceSeries::from_observations(AssetId::from("test"), points).unwrap()
    }

    #[test]
    fn first_return_is_undefined() {
        let returns = ReturnSeries::from_prices(&series(&[100.0, 110.0, 99.0]));

        assert_eq!(returns.len(), 3);
        assert_eq!(returns.points()[0].ret, None);
        assert!((returns.points()[1].ret.unwrap() - 0.10).abs() < 1e-12);
        assert!((returns.points()[2].ret.unwrap() + 0.10).abs() < 1e-12);
    }

    #[test]
    fn zero_previous_close_yields_undefined_return() {
        let returns = ReturnSeries::from_prices(&series(&[0.0, 10.0, 11.0]));

        assert_eq!(returns.points()[1].ret, None);
        assert!((returns.points()[2].ret.unwrap() - 0.10).abs() < 1e-12);
    }
}
