use thiserror::Error;

/// Why an uploaded dataset could not be turned into a table.
///
/// Row numbers count data rows from 1, header excluded.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("the file is empty or has no header row")]
    Empty,

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: malformed CSV record: {message}")]
    Csv { row: usize, message: String },

    #[error("row {row}, column '{column}': '{value}' is not a recognised date")]
    InvalidDate {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: quantity sold cannot be negative ({value})")]
    NegativeQuantity { row: usize, value: f64 },

    #[error("delimiter '{0}' is not a single ASCII character")]
    InvalidDelimiter(char),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A chart asked for something the schema cannot provide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("Column not found: {0}")]
    UnknownColumn(String),

    #[error("Column is not numeric: {0}")]
    NotNumeric(String),

    #[error("Column is not categorical: {0}")]
    NotCategorical(String),
}
