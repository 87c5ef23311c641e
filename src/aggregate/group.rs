use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::data::model::{CategoryField, NumericField, Transaction, TransactionTable};

/// One bar of a categorical chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupValue {
    pub key: String,
    pub value: f64,
}

/// One cell of a two-way breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValue {
    pub outer: String,
    pub inner: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Acc {
    sum: f64,
    count: usize,
}

impl Acc {
    fn mean(self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Accumulate `value` per key, keys in first-seen order. Rows whose key is
/// `None` are skipped.
fn accumulate<'a, K, KF, VF>(rows: &'a [Transaction], key: KF, value: VF) -> Vec<(K, Acc)>
where
    K: Hash + Eq + Clone,
    KF: Fn(&'a Transaction) -> Option<K>,
    VF: Fn(&Transaction) -> f64,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Acc)> = Vec::new();
    for tx in rows {
        let Some(k) = key(tx) else {
            continue;
        };
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Acc::default()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.sum += value(tx);
        acc.count += 1;
    }
    groups
}

fn by_category(table: &TransactionTable, by: CategoryField, field: NumericField) -> Vec<(&str, Acc)> {
    accumulate(table.rows(), |tx| by.value(tx), |tx| field.value(tx))
}

/// Sum of `field` per value of `by`.
pub fn group_sum(table: &TransactionTable, by: CategoryField, field: NumericField) -> Vec<GroupValue> {
    by_category(table, by, field)
        .into_iter()
        .map(|(key, acc)| GroupValue {
            key: key.to_string(),
            value: acc.sum,
        })
        .collect()
}

/// Mean of `field` per value of `by`.
pub fn group_mean(table: &TransactionTable, by: CategoryField, field: NumericField) -> Vec<GroupValue> {
    by_category(table, by, field)
        .into_iter()
        .map(|(key, acc)| GroupValue {
            key: key.to_string(),
            value: acc.mean(),
        })
        .collect()
}

/// The `n` groups with the largest sum of `field`, largest first.
/// Equal sums keep first-seen order; `-0.0` and `0.0` are equal.
pub fn top_n(table: &TransactionTable, by: CategoryField, field: NumericField, n: usize) -> Vec<GroupValue> {
    let mut groups = group_sum(table, by, field);
    groups.sort_by(largest_first);
    groups.truncate(n);
    groups
}

fn largest_first(a: &GroupValue, b: &GroupValue) -> Ordering {
    b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal)
}

/// Sum of `field` per (`outer`, `inner`) pair. Rows missing either key are skipped.
pub fn two_level_sum(
    table: &TransactionTable,
    outer: CategoryField,
    inner: CategoryField,
    field: NumericField,
) -> Vec<CrossValue> {
    accumulate(
        table.rows(),
        |tx| Some((outer.value(tx)?, inner.value(tx)?)),
        |tx| field.value(tx),
    )
    .into_iter()
    .map(|((o, i), acc)| CrossValue {
        outer: o.to_string(),
        inner: i.to_string(),
        value: acc.sum,
    })
    .collect()
}

/// Share of rows per value of `by`, most frequent first.
///
/// Shares are taken over rows where `by` is present, so they sum to 1.
pub fn proportion(table: &TransactionTable, by: CategoryField) -> Vec<GroupValue> {
    let mut counts = accumulate(table.rows(), |tx| by.value(tx), |_| 0.0);
    let total: usize = counts.iter().map(|(_, acc)| acc.count).sum();
    counts.sort_by(|a, b| b.1.count.cmp(&a.1.count));
    counts
        .into_iter()
        .map(|(key, acc)| GroupValue {
            key: key.to_string(),
            value: acc.count as f64 / total as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::{tx, two_rows};

    fn keys(groups: &[GroupValue]) -> Vec<(&str, f64)> {
        groups.iter().map(|g| (g.key.as_str(), g.value)).collect()
    }

    #[test]
    fn top_n_breaks_ties_by_first_seen_group() {
        let table = TransactionTable::from_rows(vec![
            tx((2024, 1, 1), "A", "s", 300.0, 0.0),
            tx((2024, 1, 2), "B", "s", 400.0, 0.0),
            tx((2024, 1, 3), "C", "s", 900.0, 0.0),
            tx((2024, 1, 4), "B", "s", 500.0, 0.0),
        ]);
        let top = top_n(&table, CategoryField::FishType, NumericField::TotalSalesValue, 2);
        assert_eq!(keys(&top), [("B", 900.0), ("C", 900.0)]);

        let all = top_n(&table, CategoryField::FishType, NumericField::TotalSalesValue, 10);
        assert_eq!(keys(&all), [("B", 900.0), ("C", 900.0), ("A", 300.0)]);
    }

    #[test]
    fn top_n_treats_negative_zero_as_a_tie() {
        let table = TransactionTable::from_rows(vec![
            tx((2024, 1, 1), "Zero", "s", 0.0, 0.0),
            tx((2024, 1, 2), "NegZero", "s", -0.0, 0.0),
            tx((2024, 1, 3), "Big", "s", 5.0, 0.0),
        ]);
        let top = top_n(&table, CategoryField::FishType, NumericField::Profit, 3);
        let names: Vec<&str> = top.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(names, ["Big", "Zero", "NegZero"]);

        let mut sums = vec![
            GroupValue { key: "negative".into(), value: -0.0 },
            GroupValue { key: "positive".into(), value: 0.0 },
        ];
        sums.sort_by(largest_first);
        assert_eq!(sums[0].key, "negative");
    }

    #[test]
    fn top_n_size_is_bounded_by_group_count() {
        let table = two_rows();
        assert_eq!(top_n(&table, CategoryField::FishType, NumericField::Profit, 0).len(), 0);
        assert_eq!(top_n(&table, CategoryField::FishType, NumericField::Profit, 1).len(), 1);
        assert_eq!(top_n(&table, CategoryField::FishType, NumericField::Profit, 5).len(), 2);
    }

    #[test]
    fn sums_and_means_follow_first_seen_order() {
        let table = TransactionTable::from_rows(vec![
            tx((2024, 1, 1), "Tilapia", "A", 100.0, 0.0),
            tx((2024, 1, 2), "Catfish", "A", 40.0, 0.0),
            tx((2024, 1, 3), "Tilapia", "B", 300.0, 0.0),
            tx((2024, 1, 4), "", "B", 999.0, 0.0),
        ]);
        let sums = group_sum(&table, CategoryField::FishType, NumericField::TotalSalesValue);
        assert_eq!(keys(&sums), [("Tilapia", 400.0), ("Catfish", 40.0)]);

        let means = group_mean(&table, CategoryField::FishType, NumericField::TotalSalesValue);
        assert_eq!(keys(&means), [("Tilapia", 200.0), ("Catfish", 40.0)]);

        let by_supplier = group_sum(&table, CategoryField::Supplier, NumericField::TotalSalesValue);
        assert_eq!(keys(&by_supplier), [("A", 140.0), ("B", 1299.0)]);
    }

    #[test]
    fn two_level_sum_cross_tabulates_pairs() {
        let mut rows = Vec::new();
        for (location, channel, sales) in [
            ("Lagos", "Online", 10.0),
            ("Abuja", "Store", 20.0),
            ("Lagos", "Online", 5.0),
            ("Lagos", "Store", 1.0),
            ("Lagos", "", 100.0),
        ] {
            let mut t = tx((2024, 1, 1), "Tilapia", "A", sales, 0.0);
            t.customer_location = Some(location.to_string());
            t.sales_channel = (!channel.is_empty()).then(|| channel.to_string());
            rows.push(t);
        }
        let table = TransactionTable::from_rows(rows);
        let cells = two_level_sum(
            &table,
            CategoryField::CustomerLocation,
            CategoryField::SalesChannel,
            NumericField::TotalSalesValue,
        );
        let got: Vec<(&str, &str, f64)> = cells
            .iter()
            .map(|c| (c.outer.as_str(), c.inner.as_str(), c.value))
            .collect();
        assert_eq!(
            got,
            [("Lagos", "Online", 15.0), ("Abuja", "Store", 20.0), ("Lagos", "Store", 1.0)]
        );
    }

    #[test]
    fn proportions_sum_to_one_and_sort_by_frequency() {
        let table = TransactionTable::from_rows(vec![
            tx((2024, 1, 1), "Tilapia", "A", 0.0, 0.0),
            tx((2024, 1, 2), "Catfish", "A", 0.0, 0.0),
            tx((2024, 1, 3), "Catfish", "A", 0.0, 0.0),
            tx((2024, 1, 4), "Mackerel", "A", 0.0, 0.0),
            tx((2024, 1, 5), "", "A", 0.0, 0.0),
        ]);
        let shares = proportion(&table, CategoryField::FishType);
        assert_eq!(keys(&shares), [("Catfish", 0.5), ("Tilapia", 0.25), ("Mackerel", 0.25)]);
        let total: f64 = shares.iter().map(|g| g.value).sum();
        assert!((total - 1.0).abs() < 1e-12);

        let suppliers = proportion(&table, CategoryField::Supplier);
        assert_eq!(keys(&suppliers), [("A", 1.0)]);
    }

    #[test]
    fn proportion_of_an_all_null_column_is_empty() {
        let table = two_rows();
        assert!(proportion(&table, CategoryField::SalesChannel).is_empty());
    }
}
