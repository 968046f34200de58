pub mod parser;
pub mod records;
pub mod source;

pub use records::{ProductRecord, SENTINEL};
pub use source::{load_catalog, CatalogSource, FileSource};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("fetch catalog from {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: std::io::Error,
    },
}
