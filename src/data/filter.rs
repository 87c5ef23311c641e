use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{Transaction, TransactionTable};

// ---------------------------------------------------------------------------
// Filter predicate: date window plus allowed fish types and suppliers
// ---------------------------------------------------------------------------

/// One sidebar state, built fresh for every render cycle.
///
/// An empty category set selects nothing; there is no implicit "all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// First calendar day kept, inclusive.
    pub start: NaiveDate,
    /// Last calendar day kept, inclusive.
    pub end: NaiveDate,
    pub fish_types: BTreeSet<String>,
    pub suppliers: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new<F, S>(start: NaiveDate, end: NaiveDate, fish_types: F, suppliers: S) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            start,
            end,
            fish_types: fish_types.into_iter().map(Into::into).collect(),
            suppliers: suppliers.into_iter().map(Into::into).collect(),
        }
    }

    /// The default selection: the whole observed date range and every
    /// observed fish type and supplier. `None` for an empty table.
    pub fn everything(table: &TransactionTable) -> Option<Self> {
        let (start, end) = table.date_range()?;
        Some(Self::new(start, end, table.fish_types(), table.suppliers()))
    }

    /// A row passes when its day is inside the window and both of its
    /// categories are allowed. Null categories never pass.
    pub fn matches(&self, tx: &Transaction) -> bool {
        let day = tx.day();
        if day < self.start || day > self.end {
            return false;
        }
        let allowed = |set: &BTreeSet<String>, value: Option<&str>| {
            value.is_some_and(|v| set.contains(v))
        };
        allowed(&self.fish_types, tx.fish_type.as_deref())
            && allowed(&self.suppliers, tx.supplier.as_deref())
    }
}

/// Return a new table holding the rows that pass `selection`, in their
/// original order. The input is left untouched.
pub fn filter_table(table: &TransactionTable, selection: &FilterSelection) -> TransactionTable {
    let rows: Vec<Transaction> = table
        .rows()
        .iter()
        .filter(|tx| selection.matches(tx))
        .cloned()
        .collect();
    log::debug!("Filter kept {} of {} rows", rows.len(), table.len());
    TransactionTable::from_ordered(rows)
}
