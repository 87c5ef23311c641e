use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use super::model::{CategoryField, Column, NumericField, Transaction, TransactionTable};
use crate::config::LoaderConfig;
use crate::error::DataLoadError;

type Result<T> = std::result::Result<T, DataLoadError>;

/// Header names every upload must carry. `Profit` is derived, never read.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    "Date",
    "Date of Sale",
    "Restock Date",
    "Fish Type",
    "Fish Size",
    "Supplier Information",
    "Customer Type",
    "Customer Location",
    "Sales Channel",
    "Quantity Sold (kg)",
    "Total Sales Value (NGN)",
    "Total Supply Cost (NGN)",
    "Cost per Unit Supply (NGN)",
    "Price per Unit Sold (NGN)",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse raw CSV bytes with the default [`LoaderConfig`].
pub fn load_dataset(raw: &[u8]) -> Result<TransactionTable> {
    load_dataset_with(raw, &LoaderConfig::default())
}

/// Read a CSV file from disk and parse it.
pub fn load_file(path: &Path, config: &LoaderConfig) -> Result<TransactionTable> {
    let raw = std::fs::read(path)?;
    load_dataset_with(&raw, config)
}

/// Parse raw CSV bytes into a table ordered by `Date`, with `Profit` filled in.
///
/// Any bad cell aborts the whole load; a partial table is never returned.
pub fn load_dataset_with(raw: &[u8], config: &LoaderConfig) -> Result<TransactionTable> {
    let delimiter = delimiter_byte(config.delimiter)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(raw);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataLoadError::Csv {
            row: 0,
            message: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataLoadError::Empty);
    }

    let index = ColumnIndex::resolve(&headers)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| DataLoadError::Csv {
            row,
            message: e.to_string(),
        })?;
        rows.push(index.parse_row(&record, row, config)?);
    }

    let table = TransactionTable::from_rows(rows);
    log::info!(
        "Loaded {} transactions ({} fish types, {} suppliers)",
        table.len(),
        table.fish_types().len(),
        table.suppliers().len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Position of each required column in the uploaded header row.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let mut positions = HashMap::new();
        let mut missing = Vec::new();
        for name in REQUIRED_COLUMNS {
            match headers.iter().position(|h| h == name) {
                Some(idx) => {
                    positions.insert(name, idx);
                }
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns(missing));
        }
        Ok(ColumnIndex { positions })
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, column: Column) -> &'r str {
        self.positions
            .get(column.name())
            .and_then(|&idx| record.get(idx))
            .unwrap_or("")
            .trim()
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        row: usize,
        config: &LoaderConfig,
    ) -> Result<Transaction> {
        let date = |column: Column| parse_date(self.cell(record, column), row, column, config);
        let number = |field: NumericField| {
            parse_number(self.cell(record, Column::Numeric(field)), row, field)
        };
        let category = |field: CategoryField| {
            let value = self.cell(record, Column::Category(field));
            (!value.is_empty()).then(|| value.to_string())
        };

        let quantity = number(NumericField::QuantitySold)?;
        if quantity < 0.0 {
            return Err(DataLoadError::NegativeQuantity {
                row,
                value: quantity,
            });
        }

        let mut tx = Transaction::new(
            date(Column::Date)?,
            number(NumericField::TotalSalesValue)?,
            number(NumericField::TotalSupplyCost)?,
        );
        tx.date_of_sale = date(Column::DateOfSale)?;
        tx.restock_date = date(Column::RestockDate)?;
        tx.fish_type = category(CategoryField::FishType);
        tx.fish_size = category(CategoryField::FishSize);
        tx.supplier = category(CategoryField::Supplier);
        tx.customer_type = category(CategoryField::CustomerType);
        tx.customer_location = category(CategoryField::CustomerLocation);
        tx.sales_channel = category(CategoryField::SalesChannel);
        tx.quantity_sold_kg = quantity;
        tx.cost_per_unit_supply = number(NumericField::CostPerUnitSupply)?;
        tx.price_per_unit_sold = number(NumericField::PricePerUnitSold)?;
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

fn delimiter_byte(c: char) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(DataLoadError::InvalidDelimiter(c))
}

fn parse_date(
    s: &str,
    row: usize,
    column: Column,
    config: &LoaderConfig,
) -> Result<NaiveDateTime> {
    let parsed = config.date_formats.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt).ok().or_else(|| {
            NaiveDate::parse_from_str(s, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
    });
    parsed.ok_or_else(|| DataLoadError::InvalidDate {
        row,
        column: column.name().to_string(),
        value: s.to_string(),
    })
}

fn parse_number(s: &str, row: usize, field: NumericField) -> Result<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataLoadError::InvalidNumber {
            row,
            column: field.name().to_string(),
            value: s.to_string(),
        })
}
