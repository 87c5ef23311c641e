//! Filtering and aggregation core of the fish-store sales dashboard.
//!
//! The presentation layer uploads a CSV, builds a [`FilterSelection`] from
//! its sidebar, and asks for one [`Section`] (or any single
//! [`AggregationRequest`]) per render.

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod state;

pub use aggregate::{aggregate, AggregationRequest, AggregationResult, ResamplePeriod, Statistic};
pub use config::{DashboardConfig, LoaderConfig};
pub use data::cache::DatasetCache;
pub use data::filter::{filter_table, FilterSelection};
pub use data::loader::{load_dataset, load_dataset_with, load_file};
pub use data::model::{CategoryField, Column, NumericField, Transaction, TransactionTable};
pub use data::sample::generate_sample_csv;
pub use error::{AggregationError, DataLoadError};
pub use report::{render_section, OverviewMetrics, Section, SectionReport};
pub use state::Session;
