/// Data layer: core types, loading, caching, and filtering.
///
/// Architecture:
/// ```text
///   uploaded .csv bytes
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  loader   │◄────│  cache   │  content-keyed memo of parsed uploads
///   └──────────┘     └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ TransactionTable │  rows ordered by Date, Profit derived
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date window + fish type / supplier membership → new table
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
