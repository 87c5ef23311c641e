use std::sync::Arc;

use crate::config::LoaderConfig;
use crate::data::cache::DatasetCache;
use crate::data::filter::{filter_table, FilterSelection};
use crate::data::model::TransactionTable;
use crate::error::DataLoadError;
use crate::report::{render_section, Section, SectionReport};

// ---------------------------------------------------------------------------
// Per-session state
// ---------------------------------------------------------------------------

/// What one user session keeps between interactions.
///
/// No filter selection is kept here; callers build a fresh
/// [`FilterSelection`] for every render and pass it in.
#[derive(Debug, Default)]
pub struct Session {
    /// Loaded dataset (None until the first successful upload).
    table: Option<Arc<TransactionTable>>,

    /// Message from the last failed upload, cleared on success.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&TransactionTable> {
        self.table.as_deref()
    }

    /// Load an upload through the shared cache.
    ///
    /// On failure the previously loaded table stays in place.
    pub fn load(
        &mut self,
        cache: &DatasetCache,
        raw: &[u8],
        config: &LoaderConfig,
    ) -> Result<(), DataLoadError> {
        match cache.get_or_load(raw, config) {
            Ok(table) => {
                self.table = Some(table);
                self.status_message = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected upload: {e}");
                self.status_message = Some(format!("Error loading dataset: {e}"));
                Err(e)
            }
        }
    }

    /// Sidebar defaults for the loaded table.
    pub fn default_selection(&self) -> Option<FilterSelection> {
        self.table().and_then(FilterSelection::everything)
    }

    /// Filter the loaded table and render one section.
    pub fn render(
        &self,
        section: Section,
        selection: &FilterSelection,
        preview_rows: usize,
    ) -> Option<SectionReport> {
        let table = self.table()?;
        let filtered = filter_table(table, selection);
        Some(render_section(&filtered, section, preview_rows))
    }
}
