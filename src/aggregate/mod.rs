/// Aggregation library: pure summaries over a (filtered) transaction table.
///
/// ```text
///   TransactionTable ──► AggregationRequest ──► resolve column names
///                                                     │
///                           ┌─────────────┬───────────┼─────────────┐
///                           ▼             ▼           ▼             ▼
///                       resample       group        stats       (errors)
///                           │             │           │
///                           └─────────────┴─────┬─────┘
///                                               ▼
///                                      AggregationResult
/// ```
///
/// Every operation returns an empty result on an empty table.
pub mod group;
pub mod resample;
pub mod stats;

use serde::{Deserialize, Serialize};

use crate::data::model::{CategoryField, Column, NumericField, TransactionTable};
use crate::error::AggregationError;

pub use group::{CrossValue, GroupValue};
pub use resample::{ResamplePeriod, SeriesPoint, Statistic};
pub use stats::ColumnSummary;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One chart's worth of aggregation. Column parameters are CSV header names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AggregationRequest {
    Resample {
        column: String,
        period: ResamplePeriod,
        statistic: Statistic,
    },
    GroupSum {
        by: String,
        column: String,
    },
    GroupMean {
        by: String,
        column: String,
    },
    TopN {
        by: String,
        column: String,
        n: usize,
    },
    TwoLevelGroup {
        outer: String,
        inner: String,
        column: String,
    },
    Proportion {
        by: String,
    },
    Describe,
}

impl AggregationRequest {
    pub fn resample(column: &str, period: ResamplePeriod, statistic: Statistic) -> Self {
        Self::Resample {
            column: column.to_string(),
            period,
            statistic,
        }
    }

    pub fn group_sum(by: &str, column: &str) -> Self {
        Self::GroupSum {
            by: by.to_string(),
            column: column.to_string(),
        }
    }

    pub fn group_mean(by: &str, column: &str) -> Self {
        Self::GroupMean {
            by: by.to_string(),
            column: column.to_string(),
        }
    }

    pub fn top_n(by: &str, column: &str, n: usize) -> Self {
        Self::TopN {
            by: by.to_string(),
            column: column.to_string(),
            n,
        }
    }

    pub fn two_level(outer: &str, inner: &str, column: &str) -> Self {
        Self::TwoLevelGroup {
            outer: outer.to_string(),
            inner: inner.to_string(),
            column: column.to_string(),
        }
    }

    pub fn proportion(by: &str) -> Self {
        Self::Proportion { by: by.to_string() }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A small table ready to hand to a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum AggregationResult {
    Series(Vec<SeriesPoint>),
    Groups(Vec<GroupValue>),
    CrossTab(Vec<CrossValue>),
    Summary(Vec<ColumnSummary>),
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        match self {
            AggregationResult::Series(v) => v.len(),
            AggregationResult::Groups(v) => v.len(),
            AggregationResult::CrossTab(v) => v.len(),
            AggregationResult::Summary(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run `request` over `table`.
///
/// Column names are checked before any row is read, so a bad request
/// fails the same way on an empty table.
pub fn aggregate(
    table: &TransactionTable,
    request: &AggregationRequest,
) -> Result<AggregationResult, AggregationError> {
    use AggregationRequest::*;

    let result = match request {
        Resample {
            column,
            period,
            statistic,
        } => AggregationResult::Series(resample::resample(
            table,
            numeric(column)?,
            *period,
            *statistic,
        )),
        GroupSum { by, column } => {
            AggregationResult::Groups(group::group_sum(table, category(by)?, numeric(column)?))
        }
        GroupMean { by, column } => {
            AggregationResult::Groups(group::group_mean(table, category(by)?, numeric(column)?))
        }
        TopN { by, column, n } => {
            AggregationResult::Groups(group::top_n(table, category(by)?, numeric(column)?, *n))
        }
        TwoLevelGroup {
            outer,
            inner,
            column,
        } => AggregationResult::CrossTab(group::two_level_sum(
            table,
            category(outer)?,
            category(inner)?,
            numeric(column)?,
        )),
        Proportion { by } => AggregationResult::Groups(group::proportion(table, category(by)?)),
        Describe => AggregationResult::Summary(stats::describe(table)),
    };
    Ok(result)
}

fn numeric(name: &str) -> Result<NumericField, AggregationError> {
    match Column::from_name(name) {
        Some(Column::Numeric(field)) => Ok(field),
        Some(_) => Err(AggregationError::NotNumeric(name.to_string())),
        None => Err(AggregationError::UnknownColumn(name.to_string())),
    }
}

fn category(name: &str) -> Result<CategoryField, AggregationError> {
    match Column::from_name(name) {
        Some(Column::Category(field)) => Ok(field),
        Some(_) => Err(AggregationError::NotCategorical(name.to_string())),
        None => Err(AggregationError::UnknownColumn(name.to_string())),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::two_rows;
    use super::*;

    #[test]
    fn unknown_and_mistyped_columns_are_rejected() {
        let table = two_rows();
        assert_eq!(
            aggregate(&table, &AggregationRequest::group_sum("Fish Type", "Revenue")),
            Err(AggregationError::UnknownColumn("Revenue".into()))
        );
        assert_eq!(
            aggregate(&table, &AggregationRequest::group_sum("Fish Type", "Sales Channel")),
            Err(AggregationError::NotNumeric("Sales Channel".into()))
        );
        assert_eq!(
            aggregate(&table, &AggregationRequest::proportion("Profit")),
            Err(AggregationError::NotCategorical("Profit".into()))
        );
        assert_eq!(
            aggregate(
                &table,
                &AggregationRequest::resample("Date", ResamplePeriod::Monthly, Statistic::Sum)
            ),
            Err(AggregationError::NotNumeric("Date".into()))
        );
    }

    #[test]
    fn column_errors_do_not_depend_on_data() {
        let empty = TransactionTable::default();
        assert!(aggregate(&empty, &AggregationRequest::top_n("Nope", "Profit", 3)).is_err());
    }

    #[test]
    fn every_operation_degrades_to_empty() {
        let empty = TransactionTable::default();
        let requests = [
            AggregationRequest::resample("Total Sales Value (NGN)", ResamplePeriod::Annual, Statistic::Mean),
            AggregationRequest::group_sum("Fish Type", "Profit"),
            AggregationRequest::group_mean("Supplier Information", "Profit"),
            AggregationRequest::top_n("Fish Type", "Profit", 5),
            AggregationRequest::two_level("Customer Location", "Sales Channel", "Profit"),
            AggregationRequest::proportion("Customer Type"),
            AggregationRequest::Describe,
        ];
        for request in &requests {
            let result = aggregate(&empty, request);
            assert!(matches!(result, Ok(ref r) if r.is_empty()), "{request:?} gave {result:?}");
        }
    }

    #[test]
    fn monthly_sales_for_the_two_row_table() {
        let result = aggregate(
            &two_rows(),
            &AggregationRequest::resample("Total Sales Value (NGN)", ResamplePeriod::Monthly, Statistic::Sum),
        );
        match result {
            Ok(AggregationResult::Series(points)) => {
                let got: Vec<(&str, f64)> = points.iter().map(|p| (p.period.as_str(), p.value)).collect();
                assert_eq!(got, [("2024-01", 1000.0), ("2024-02", 500.0)]);
            }
            other => panic!("expected a series, got {other:?}"),
        }
    }

    #[test]
    fn requests_and_results_are_json() {
        let request: Result<AggregationRequest, _> =
            serde_json::from_str(r#"{"op":"top_n","by":"Fish Type","column":"Profit","n":2}"#);
        assert_eq!(request.ok(), Some(AggregationRequest::top_n("Fish Type", "Profit", 2)));

        let describe: Result<AggregationRequest, _> = serde_json::from_str(r#"{"op":"describe"}"#);
        assert_eq!(describe.ok(), Some(AggregationRequest::Describe));

        let result = aggregate(&two_rows(), &AggregationRequest::group_sum("Fish Type", "Profit"));
        let json = result.ok().and_then(|r| serde_json::to_value(r).ok());
        assert_eq!(
            json,
            Some(serde_json::json!({
                "kind": "groups",
                "rows": [
                    { "key": "Tilapia", "value": 400.0 },
                    { "key": "Catfish", "value": 200.0 }
                ]
            }))
        );
    }
}
