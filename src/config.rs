use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Settings read by the surrounding application
// ---------------------------------------------------------------------------

/// Top-level settings. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub loader: LoaderConfig,
    /// How many parsed uploads the [`crate::DatasetCache`] keeps.
    pub cache_capacity: usize,
    /// Rows shown in the overview preview.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            cache_capacity: 8,
            preview_rows: 5,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// How CSV cells are read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// `chrono` format strings tried in order. Date-only formats give midnight.
    pub date_formats: Vec<String>,
    pub delimiter: char,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            date_formats: [
                "%Y-%m-%d",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%dT%H:%M:%S",
                "%m/%d/%Y",
                "%m/%d/%Y %H:%M",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            delimiter: ',',
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = DashboardConfig::from_json_str(r#"{ "cache_capacity": 2 }"#);
        assert!(cfg.is_ok());
        if let Ok(cfg) = cfg {
            assert_eq!(cfg.cache_capacity, 2);
            assert_eq!(cfg.preview_rows, 5);
            assert_eq!(cfg.loader, LoaderConfig::default());
        }
    }

    #[test]
    fn loader_section_overrides_delimiter_only() {
        let cfg = DashboardConfig::from_json_str(r#"{ "loader": { "delimiter": ";" } }"#);
        assert!(cfg.is_ok());
        if let Ok(cfg) = cfg {
            assert_eq!(cfg.loader.delimiter, ';');
            assert_eq!(cfg.loader.date_formats.len(), 5);
        }
    }

    #[test]
    fn from_path_reports_the_file_on_bad_json() {
        let file = tempfile::NamedTempFile::new();
        assert!(file.is_ok());
        if let Ok(mut file) = file {
            assert!(file.write_all(b"{ not json").is_ok());
            let err = DashboardConfig::from_path(file.path());
            assert!(err.is_err());
            if let Err(e) = err {
                assert!(format!("{e:#}").contains("parsing config"));
            }
        }
    }
}
