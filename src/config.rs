use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Delimited catalog file read at startup and on reload.
    pub catalog_path: PathBuf,
    /// JSON file backing the key-value store; in-memory when unset.
    pub storage_path: Option<PathBuf>,
    pub suggestion_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let catalog_path = std::env::var("CATALOG_PATH")
            .unwrap_or_else(|_| "data/catcan-list1.csv".into())
            .into();
        let storage_path = std::env::var("STORAGE_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let suggestion_limit = std::env::var("SUGGESTION_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(20);
        Ok(Self {
            catalog_path,
            storage_path,
            suggestion_limit,
        })
    }
}
