//! Catalog discovery and output settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use tracing::debug;

use fitsim_lib::{Catalog, ReportFormat};

/// Environment variable naming an item catalog to load.
pub const CATALOG_ENV: &str = "FITSIM_CATALOG";

/// Filename looked up in the platform data directory.
pub const CATALOG_FILENAME: &str = "catalog.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Csv => ReportFormat::Csv,
        }
    }
}

/// Platform data directory location of the catalog, if one can be derived.
pub fn default_catalog_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "fitsim", "fitsim").map(|dirs| dirs.data_dir().join(CATALOG_FILENAME))
}

/// Candidate catalog paths in lookup order.
///
/// 1. `FITSIM_CATALOG`
/// 2. `<data dir>/catalog.json`
/// 3. Debug fixture path (only in debug builds)
pub fn catalog_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(env_path) = std::env::var(CATALOG_ENV) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Some(path) = default_catalog_path() {
        candidates.push(path);
    }

    if cfg!(debug_assertions) {
        let fixture =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/catalog.json");
        candidates.push(fixture);
    }

    candidates
}

/// Pick the catalog to load. An explicit path always wins, even when it
/// does not exist, so a typo surfaces as a load error.
pub fn resolve_catalog_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    catalog_candidates()
        .into_iter()
        .find(|path| path.exists())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "{CATALOG_FILENAME} not found; pass --catalog or set {CATALOG_ENV}"
            )
        })
}

pub fn load_catalog(explicit: Option<&Path>) -> Result<Catalog> {
    let path = resolve_catalog_path(explicit)?;
    debug!(path = %path.display(), "loading catalog");
    Catalog::from_path(&path)
        .with_context(|| format!("failed to load catalog from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_used_verbatim() {
        let path = Path::new("/nonexistent/catalog.json");
        assert_eq!(resolve_catalog_path(Some(path)).expect("explicit"), path);
        assert!(load_catalog(Some(path)).is_err());
    }

    #[test]
    fn debug_builds_fall_back_to_the_fixture() {
        let candidates = catalog_candidates();
        assert!(candidates
            .last()
            .is_some_and(|path| path.ends_with("docs/fixtures/catalog.json")));
    }

    #[test]
    fn formats_map_onto_report_formats() {
        assert_eq!(ReportFormat::from(OutputFormat::Csv), ReportFormat::Csv);
        assert_eq!(ReportFormat::from(OutputFormat::default()), ReportFormat::Text);
    }
}
