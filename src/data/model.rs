use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Column – the fixed schema of the transaction CSV
// ---------------------------------------------------------------------------

/// Every column a loaded table exposes, keyed by its CSV header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    DateOfSale,
    RestockDate,
    Category(CategoryField),
    Numeric(NumericField),
}

/// String-valued columns that can be grouped on or filtered by membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    FishType,
    FishSize,
    Supplier,
    CustomerType,
    CustomerLocation,
    SalesChannel,
}

/// Decimal columns, including the derived `Profit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    QuantitySold,
    TotalSalesValue,
    TotalSupplyCost,
    CostPerUnitSupply,
    PricePerUnitSold,
    Profit,
}

impl CategoryField {
    pub const ALL: [CategoryField; 6] = [
        CategoryField::FishType,
        CategoryField::FishSize,
        CategoryField::Supplier,
        CategoryField::CustomerType,
        CategoryField::CustomerLocation,
        CategoryField::SalesChannel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CategoryField::FishType => "Fish Type",
            CategoryField::FishSize => "Fish Size",
            CategoryField::Supplier => "Supplier Information",
            CategoryField::CustomerType => "Customer Type",
            CategoryField::CustomerLocation => "Customer Location",
            CategoryField::SalesChannel => "Sales Channel",
        }
    }

    /// The row's value for this field; `None` when the cell was empty.
    pub fn value(self, tx: &Transaction) -> Option<&str> {
        let cell = match self {
            CategoryField::FishType => &tx.fish_type,
            CategoryField::FishSize => &tx.fish_size,
            CategoryField::Supplier => &tx.supplier,
            CategoryField::CustomerType => &tx.customer_type,
            CategoryField::CustomerLocation => &tx.customer_location,
            CategoryField::SalesChannel => &tx.sales_channel,
        };
        cell.as_deref()
    }
}

impl NumericField {
    /// Column order used by summary statistics.
    pub const ALL: [NumericField; 6] = [
        NumericField::QuantitySold,
        NumericField::TotalSalesValue,
        NumericField::TotalSupplyCost,
        NumericField::CostPerUnitSupply,
        NumericField::PricePerUnitSold,
        NumericField::Profit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericField::QuantitySold => "Quantity Sold (kg)",
            NumericField::TotalSalesValue => "Total Sales Value (NGN)",
            NumericField::TotalSupplyCost => "Total Supply Cost (NGN)",
            NumericField::CostPerUnitSupply => "Cost per Unit Supply (NGN)",
            NumericField::PricePerUnitSold => "Price per Unit Sold (NGN)",
            NumericField::Profit => "Profit",
        }
    }

    pub fn value(self, tx: &Transaction) -> f64 {
        match self {
            NumericField::QuantitySold => tx.quantity_sold_kg,
            NumericField::TotalSalesValue => tx.total_sales_value,
            NumericField::TotalSupplyCost => tx.total_supply_cost,
            NumericField::CostPerUnitSupply => tx.cost_per_unit_supply,
            NumericField::PricePerUnitSold => tx.price_per_unit_sold,
            NumericField::Profit => tx.profit,
        }
    }
}

impl Column {
    /// Look a column up by its CSV header name.
    pub fn from_name(name: &str) -> Option<Column> {
        match name {
            "Date" => return Some(Column::Date),
            "Date of Sale" => return Some(Column::DateOfSale),
            "Restock Date" => return Some(Column::RestockDate),
            _ => {}
        }
        if let Some(c) = CategoryField::ALL.iter().find(|c| c.name() == name) {
            return Some(Column::Category(*c));
        }
        NumericField::ALL
            .iter()
            .find(|n| n.name() == name)
            .map(|n| Column::Numeric(*n))
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::DateOfSale => "Date of Sale",
            Column::RestockDate => "Restock Date",
            Column::Category(c) => c.name(),
            Column::Numeric(n) => n.name(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Transaction – one row of the uploaded CSV
// ---------------------------------------------------------------------------

/// A single sale record.
///
/// The money fields are private so that `profit` can only be written
/// together with the two amounts it is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Primary time axis; the table is ordered by it.
    pub date: NaiveDateTime,
    pub date_of_sale: NaiveDateTime,
    pub restock_date: NaiveDateTime,
    pub fish_type: Option<String>,
    pub fish_size: Option<String>,
    pub supplier: Option<String>,
    pub customer_type: Option<String>,
    pub customer_location: Option<String>,
    pub sales_channel: Option<String>,
    pub quantity_sold_kg: f64,
    pub cost_per_unit_supply: f64,
    pub price_per_unit_sold: f64,
    total_sales_value: f64,
    total_supply_cost: f64,
    profit: f64,
}

impl Transaction {
    /// A transaction dated `date` (also used for the sale and restock
    /// dates) with no categories and zero quantities.
    pub fn new(date: NaiveDateTime, total_sales_value: f64, total_supply_cost: f64) -> Self {
        Transaction {
            date,
            date_of_sale: date,
            restock_date: date,
            fish_type: None,
            fish_size: None,
            supplier: None,
            customer_type: None,
            customer_location: None,
            sales_channel: None,
            quantity_sold_kg: 0.0,
            cost_per_unit_supply: 0.0,
            price_per_unit_sold: 0.0,
            total_sales_value,
            total_supply_cost,
            profit: total_sales_value - total_supply_cost,
        }
    }

    pub fn total_sales_value(&self) -> f64 {
        self.total_sales_value
    }

    pub fn total_supply_cost(&self) -> f64 {
        self.total_supply_cost
    }

    pub fn profit(&self) -> f64 {
        self.profit
    }

    /// Replace both amounts and recompute `profit`.
    pub fn set_amounts(&mut self, total_sales_value: f64, total_supply_cost: f64) {
        self.total_sales_value = total_sales_value;
        self.total_supply_cost = total_supply_cost;
        self.profit = total_sales_value - total_supply_cost;
    }

    /// Calendar day of the primary `Date` column.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

// ---------------------------------------------------------------------------
// TransactionTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Rows ordered by `Date` ascending, ties kept in file order.
///
/// Immutable once built: filtering and aggregation return new values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionTable {
    rows: Vec<Transaction>,
}

impl TransactionTable {
    /// Build a table, stable-sorting the rows by `Date`.
    pub fn from_rows(mut rows: Vec<Transaction>) -> Self {
        rows.sort_by_key(|tx| tx.date);
        TransactionTable { rows }
    }

    /// Rows taken from an already ordered table.
    pub(crate) fn from_ordered(rows: Vec<Transaction>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].date <= w[1].date));
        TransactionTable { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last calendar day of the `Date` index.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.first()?;
        let last = self.rows.last()?;
        Some((first.day(), last.day()))
    }

    /// Distinct non-null values of a category, in first-seen order.
    pub fn distinct(&self, field: CategoryField) -> Vec<String> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .filter_map(|tx| field.value(tx))
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }

    pub fn fish_types(&self) -> Vec<String> {
        self.distinct(CategoryField::FishType)
    }

    pub fn suppliers(&self) -> Vec<String> {
        self.distinct(CategoryField::Supplier)
    }
}
