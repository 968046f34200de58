use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{error, info};

use super::records::{build_records, CatalogLoad};
use super::CatalogError;

/// Where the raw catalog text comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<String, CatalogError>;
}

/// Reads the catalog from a delimited text file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    async fn fetch(&self) -> Result<String, CatalogError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Fetch {
                location: self.path.display().to_string(),
                source,
            })
    }
}

/// Fetches once and builds records. A failed fetch is logged and yields an
/// empty load, which callers treat as the "no data" state.
pub async fn load_catalog(source: &dyn CatalogSource) -> CatalogLoad {
    match source.fetch().await {
        Ok(text) => {
            let load = build_records(&text);
            info!(products = load.records.len(), skipped = load.skipped.len(), "catalog loaded");
            load
        }
        Err(e) => {
            error!(error = %e, "catalog fetch failed");
            CatalogLoad::default()
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    /// Serves fixed text, or fails when constructed with `None`.
    #[derive(Clone)]
    pub struct FakeSource(pub Option<String>);

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn fetch(&self) -> Result<String, CatalogError> {
            self.0.clone().ok_or_else(|| CatalogError::Fetch {
                location: "fake".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no catalog"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeSource;
    use super::*;
    use crate::catalog::records::fixtures::HEADER;

    #[tokio::test]
    async fn fetch_failure_yields_empty_load() {
        let load = load_catalog(&FakeSource(None)).await;
        assert!(load.records.is_empty());
    }

    #[tokio::test]
    async fn missing_file_yields_empty_load() {
        let source = FileSource::new("/definitely/not/here.csv");
        assert!(source.fetch().await.is_err());
        assert!(load_catalog(&source).await.records.is_empty());
    }

    #[tokio::test]
    async fn loads_two_of_three_rows() {
        let text = format!(
            "{HEADER}\n\
             A,n1,f,80,70,10,2,1,2,82,0.2,0.2,400,Japan\n\
             B,n2,f,80,70,10,2,1,2,82\n\
             C,n3,f,160,140,10,2,1,2,82,0.2,0.2,400,Thailand"
        );
        let load = load_catalog(&FakeSource(Some(text))).await;
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.skipped.len(), 1);
    }
}
