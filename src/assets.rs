//! Pre-rendered chart assets under the plots directory.
//!
//! Charts are produced elsewhere and published as `/plots/<lowercased-id>.html`.
//! This store only maps those paths to files and fingerprints their content;
//! it never inspects the HTML.

use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::catalog::{resolve_chart_asset_path, Catalog, PLOTS_PREFIX};
use crate::error::{DashboardError, Result};

/// Body served in place of a missing chart.
pub const MISSING_PLACEHOLDER: &str = "<!DOCTYPE html><html><body style=\"font-family:sans-serif;color:#7f8c8d;display:flex;align-items:center;justify-content:center;height:100vh;margin:0\"><p>Chart not available</p></body></html>";

#[derive(Debug, Clone)]
pub struct ChartAsset {
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`, hex encoded
    pub fingerprint: String,
}

impl ChartAsset {
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.fingerprint)
    }
}

pub fn content_sha256(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[derive(Debug, Clone)]
pub struct PlotStore {
    dir: PathBuf,
}

impl PlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Map `/plots/<name>.html` to a file inside the plots directory.
    pub fn file_for(&self, asset_path: &str) -> Result<PathBuf> {
        let invalid = || DashboardError::InvalidAssetPath(asset_path.to_string());
        let file_name = asset_path.strip_prefix(PLOTS_PREFIX).ok_or_else(invalid)?;
        let stem = file_name.strip_suffix(".html").ok_or_else(invalid)?;
        let ok = !stem.is_empty()
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !ok {
            return Err(invalid());
        }
        Ok(self.dir.join(file_name))
    }

    pub async fn load(&self, asset_path: &str) -> Result<ChartAsset> {
        let path = self.file_for(asset_path)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(DashboardError::AssetNotFound(asset_path.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        let fingerprint = content_sha256(&bytes);
        Ok(ChartAsset { bytes, fingerprint })
    }

    /// Catalog ids whose chart file is not published.
    pub fn missing(&self, catalog: &Catalog) -> Vec<&'static str> {
        catalog
            .ids()
            .filter(|id| {
                self.file_for(&resolve_chart_asset_path(id))
                    .map(|p| !p.is_file())
                    .unwrap_or(true)
            })
            .collect()
    }
}
