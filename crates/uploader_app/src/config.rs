//! Configuration file handling for uploader_app.
//!
//! The shell reads `uploader.ron` (or a caller-supplied path) and falls back
//! to documented defaults when the file is missing or malformed. The core
//! policy type stays serde-free; this module maps between the two.

use std::fs;
use std::path::Path;

use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};
use uploader_core::{UploadPolicy, DEFAULT_MAX_SIZE_BYTES};

pub(crate) const CONFIG_FILENAME: &str = "uploader.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Base URL of the upload service.
    pub endpoint: String,
    /// Maximum accepted file size in megabytes.
    pub max_size_mb: f64,
    /// Accepted file formats: extensions (".JPG") or media types.
    pub allowed_formats: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000".to_string(),
            max_size_mb: 10.0,
            allowed_formats: vec![".JPG".to_string(), ".PNG".to_string()],
        }
    }
}

impl AppConfig {
    /// The core-facing policy derived from this configuration. Non-positive
    /// size limits fall back to the core default.
    pub(crate) fn policy(&self) -> UploadPolicy {
        let max_size_bytes = if self.max_size_mb > 0.0 {
            (self.max_size_mb * 1024.0 * 1024.0) as u64
        } else {
            DEFAULT_MAX_SIZE_BYTES
        };
        UploadPolicy::new(max_size_bytes, self.allowed_formats.clone())
    }
}

pub(crate) fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            engine_info!("No config at {:?}; using defaults", path);
            return AppConfig::default();
        }
        Err(err) => {
            engine_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            engine_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
