use serde::{Deserialize, Serialize};

use crate::data::model::{NumericField, TransactionTable};

/// Count, mean, spread and quartiles of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two rows.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Describe every numeric column. Empty for an empty table.
pub fn describe(table: &TransactionTable) -> Vec<ColumnSummary> {
    if table.is_empty() {
        return Vec::new();
    }
    NumericField::ALL
        .iter()
        .map(|&field| {
            let values: Vec<f64> = table.rows().iter().map(|tx| field.value(tx)).collect();
            summarize(field.name(), values)
        })
        .collect()
}

fn summarize(column: &str, mut values: Vec<f64>) -> ColumnSummary {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });
    ColumnSummary {
        column: column.to_string(),
        count: n,
        mean,
        std,
        min: values[0],
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values[n - 1],
    }
}

/// Linear interpolation between the closest ranks of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
