use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::data::model::{NumericField, TransactionTable};

/// Calendar bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResamplePeriod {
    Monthly,
    Annual,
}

/// What to compute per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Sum,
    Mean,
}

/// One point of a time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// `YYYY-MM` or `YYYY`.
    pub period: String,
    /// First calendar day of the bucket.
    pub start: NaiveDate,
    pub value: f64,
}

impl ResamplePeriod {
    fn bucket_start(self, day: NaiveDate) -> NaiveDate {
        let start = match self {
            ResamplePeriod::Monthly => day.with_day(1),
            ResamplePeriod::Annual => day.with_ordinal(1),
        };
        start.unwrap_or(day)
    }

    fn label(self, start: NaiveDate) -> String {
        match self {
            ResamplePeriod::Monthly => start.format("%Y-%m").to_string(),
            ResamplePeriod::Annual => start.format("%Y").to_string(),
        }
    }
}

/// Bucket rows by calendar month or year of `Date` and reduce `field`.
///
/// Only buckets that received at least one row appear; gaps are not filled.
pub fn resample(
    table: &TransactionTable,
    field: NumericField,
    period: ResamplePeriod,
    statistic: Statistic,
) -> Vec<SeriesPoint> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for tx in table.rows() {
        let bucket = buckets.entry(period.bucket_start(tx.day())).or_default();
        bucket.0 += field.value(tx);
        bucket.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(start, (sum, count))| SeriesPoint {
            period: period.label(start),
            start,
            value: match statistic {
                Statistic::Sum => sum,
                Statistic::Mean => sum / count as f64,
            },
        })
        .collect()
}
