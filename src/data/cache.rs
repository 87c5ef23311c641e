use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;

use super::loader::load_dataset_with;
use super::model::TransactionTable;
use crate::config::LoaderConfig;
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Content-keyed memo of parsed uploads
// ---------------------------------------------------------------------------

struct Entry {
    content: Arc<[u8]>,
    config: LoaderConfig,
    table: Arc<TransactionTable>,
}

impl Entry {
    fn holds(&self, raw: &[u8], config: &LoaderConfig) -> bool {
        *self.content == *raw && self.config == *config
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<u64, Entry>,
    /// Insertion order, oldest first, for eviction.
    order: VecDeque<u64>,
}

/// Parsed tables keyed by the exact bytes and loader settings they were
/// loaded with.
///
/// Shared between sessions; entries are immutable and replaced whole.
pub struct DatasetCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl DatasetCache {
    /// A capacity of zero disables memoization.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Return the table for `raw`, parsing only on a miss.
    ///
    /// Failed loads are not remembered. The same bytes loaded under two
    /// different configs are two separate entries.
    pub fn get_or_load(
        &self,
        raw: &[u8],
        config: &LoaderConfig,
    ) -> Result<Arc<TransactionTable>, DataLoadError> {
        let key = content_key(raw, config);
        if let Some(entry) = self.inner.lock().entries.get(&key) {
            if entry.holds(raw, config) {
                log::debug!("Dataset cache hit ({} bytes)", raw.len());
                return Ok(Arc::clone(&entry.table));
            }
        }

        log::debug!("Dataset cache miss ({} bytes)", raw.len());
        let table = Arc::new(load_dataset_with(raw, config)?);
        self.insert(key, raw, config, Arc::clone(&table));
        Ok(table)
    }

    /// Drop every entry loaded from `raw`, whatever its config.
    pub fn invalidate(&self, raw: &[u8]) {
        let mut inner = self.inner.lock();
        let Inner { entries, order } = &mut *inner;
        entries.retain(|_, e| *e.content != *raw);
        order.retain(|k| entries.contains_key(k));
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, key: u64, raw: &[u8], config: &LoaderConfig, table: Arc<TransactionTable>) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.lock();
        let entry = Entry {
            content: Arc::from(raw),
            config: config.clone(),
            table,
        };
        if inner.entries.insert(key, entry).is_none() {
            inner.order.push_back(key);
        }
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }
    }
}

fn content_key(raw: &[u8], config: &LoaderConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    raw.hash(&mut hasher);
    config.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    const CSV: &str = "Date,Date of Sale,Restock Date,Fish Type,Fish Size,Supplier Information,\
Customer Type,Customer Location,Sales Channel,Quantity Sold (kg),Total Sales Value (NGN),\
Total Supply Cost (NGN),Cost per Unit Supply (NGN),Price per Unit Sold (NGN)\n\
2024-01-05,2024-01-05,2024-01-01,Tilapia,Small,A,Retail,Lagos,Online,1,10,5,5,10\n";

    #[test]
    fn identical_content_is_served_from_memo() {
        let cache = DatasetCache::new(4);
        let config = LoaderConfig::default();
        let first = cache.get_or_load(CSV.as_bytes(), &config);
        let second = cache.get_or_load(CSV.as_bytes(), &config);
        assert!(first.is_ok() && second.is_ok());
        if let (Ok(a), Ok(b)) = (first, second) {
            assert!(Arc::ptr_eq(&a, &b));
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_content_is_parsed_again() {
        let cache = DatasetCache::new(4);
        let config = LoaderConfig::default();
        let other = format!("{CSV}2024-01-06,2024-01-06,2024-01-01,Catfish,Large,B,Retail,Lagos,Online,1,20,5,5,20\n");
        let a = cache.get_or_load(CSV.as_bytes(), &config);
        let b = cache.get_or_load(other.as_bytes(), &config);
        assert!(matches!(a, Ok(ref t) if t.len() == 1));
        assert!(matches!(b, Ok(ref t) if t.len() == 2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let cache = DatasetCache::new(4);
        assert!(cache.get_or_load(b"Date\nnope", &LoaderConfig::default()).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_and_clear_drop_entries() {
        let cache = DatasetCache::new(4);
        let config = LoaderConfig::default();
        assert!(cache.get_or_load(CSV.as_bytes(), &config).is_ok());
        cache.invalidate(b"something else");
        assert_eq!(cache.len(), 1);
        cache.invalidate(CSV.as_bytes());
        assert!(cache.is_empty());

        assert!(cache.get_or_load(CSV.as_bytes(), &config).is_ok());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn same_bytes_under_another_config_are_parsed_again() {
        let cache = DatasetCache::new(4);
        let semicolons = CSV.replace(',', ";");
        let semicolon_config = LoaderConfig {
            delimiter: ';',
            ..LoaderConfig::default()
        };

        let first = cache.get_or_load(semicolons.as_bytes(), &semicolon_config);
        assert!(matches!(first, Ok(ref t) if t.len() == 1));

        let default_config = LoaderConfig::default();
        assert!(load_dataset_with(semicolons.as_bytes(), &default_config).is_err());
        assert!(cache.get_or_load(semicolons.as_bytes(), &default_config).is_err());

        let again = cache.get_or_load(semicolons.as_bytes(), &semicolon_config);
        assert!(matches!((first, again), (Ok(a), Ok(b)) if Arc::ptr_eq(&a, &b)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_drops_the_content_under_every_config() {
        let cache = DatasetCache::new(4);
        let iso_only = LoaderConfig {
            date_formats: vec!["%Y-%m-%d".to_string()],
            ..LoaderConfig::default()
        };
        assert!(cache.get_or_load(CSV.as_bytes(), &LoaderConfig::default()).is_ok());
        assert!(cache.get_or_load(CSV.as_bytes(), &iso_only).is_ok());
        assert_eq!(cache.len(), 2);
        cache.invalidate(CSV.as_bytes());
        assert!(cache.is_empty());
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let cache = DatasetCache::new(2);
        let config = LoaderConfig::default();
        let variants: Vec<String> = (0..3).map(|i| format!("{CSV}{}", "\n".repeat(i))).collect();
        let tables: Vec<_> = variants
            .iter()
            .filter_map(|v| cache.get_or_load(v.as_bytes(), &config).ok())
            .collect();
        assert_eq!(tables.len(), 3);
        assert_eq!(cache.len(), 2);

        // The first upload was evicted, so it parses into a fresh table.
        let again = cache.get_or_load(variants[0].as_bytes(), &config);
        assert!(matches!(again, Ok(ref t) if !Arc::ptr_eq(t, &tables[0])));
    }

    #[test]
    fn zero_capacity_never_stores() {
        let cache = DatasetCache::new(0);
        assert!(cache.get_or_load(CSV.as_bytes(), &LoaderConfig::default()).is_ok());
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_sessions_share_one_entry() {
        let cache = Arc::new(DatasetCache::new(4));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache
                        .get_or_load(CSV.as_bytes(), &LoaderConfig::default())
                        .map(|t| t.len())
                        .unwrap_or(0)
                })
            })
            .collect();
        for handle in handles {
            assert!(matches!(handle.join(), Ok(1)));
        }
        assert_eq!(cache.len(), 1);
    }
}
