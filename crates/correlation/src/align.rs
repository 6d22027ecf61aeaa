use crate::returns::ReturnSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One date present in both return series, with both returns defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub ret_a: f64,
    pub ret_b: f64,
}

/// The common-date, both-defined subset of two assets' return series,
/// ascending in date. Zero rows is a valid "no overlap" result, not an
/// error; the correlator reports it as an undefined coefficient.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedPair {
    rows: Vec<AlignedRow>,
}

impl AlignedPair {
    /// Inner-joins two return series on date equality.
    ///
    /// Any date missing from either series is discarded, as is any row
    /// whose return is undefined on either side (the leading observation,
    /// zero-previous-close days). Output order follows ascending date.
    pub fn join(a: &ReturnSeries, b: &ReturnSeries) -> Self {
        let b_by_date: BTreeMap<NaiveDate, f64> = b
            .points()
            .iter()
            .filter_map(|p| p.ret.map(|ret| (p.date, ret)))
            .collect();

        let rows = a
            .points()
            .iter()
            .filter_map(|p| {
                let ret_a = p.ret?;
                let ret_b = *b_by_date.get(&p.date)?;
                Some(AlignedRow {
                    date: p.date,
                    ret_a,
                    ret_b,
                })
            })
            .collect();

        Self { rows }
    }

    /// Wraps rows that are already joined and date-ascending.
    pub fn from_rows(rows: Vec<AlignedRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AlignedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
