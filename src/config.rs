use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::export::DOWNLOAD_FILE_NAME;

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV: &str = "EDA_ANALYZER_CONFIG";

/// Window and report settings. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
    /// Upper bound on histogram bins.
    pub max_histogram_bins: usize,
    pub download_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Universal EDA Analyzer".to_string(),
            window_size: [1280.0, 900.0],
            min_window_size: [720.0, 480.0],
            preview_rows: 5,
            max_histogram_bins: 50,
            download_file_name: DOWNLOAD_FILE_NAME.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing configuration JSON")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Read the file named by [`CONFIG_ENV`] if set. Problems are logged and
    /// the defaults are used instead.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_path(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Using default configuration: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "preview_rows": 10 }"#).unwrap();
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.download_file_name, "cleaned_dataset.csv");
        assert_eq!(config.max_histogram_bins, 50);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(AppConfig::from_json("{ preview_rows: }").is_err());
        assert!(AppConfig::from_path(Path::new("/no/such/config.json")).is_err());
    }
}
