use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::browse::store::CatalogStore;
use crate::catalog::{load_catalog, CatalogSource, FileSource};
use crate::config::AppConfig;
use crate::nutrition::ledger::{Clock, SystemClock};
use crate::nutrition::session::CalculatorSession;
use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn CatalogSource>,
    pub catalog: Arc<Mutex<CatalogStore>>,
    pub calculator: Arc<Mutex<CalculatorSession>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let source = Arc::new(FileSource::new(&config.catalog_path)) as Arc<dyn CatalogSource>;

        let store = match &config.storage_path {
            Some(path) => {
                info!(path = %path.display(), "using json file store");
                Arc::new(JsonFileStore::open(path)) as Arc<dyn KeyValueStore>
            }
            None => {
                info!("STORAGE_PATH not set; calculator state lives in memory");
                Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>
            }
        };

        Ok(Self::from_parts(config, source, store, Arc::new(SystemClock)).await)
    }

    /// Loads the catalog once through `source` and restores calculator state.
    pub async fn from_parts(
        config: Arc<AppConfig>,
        source: Arc<dyn CatalogSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let load = load_catalog(source.as_ref()).await;
        Self {
            config,
            source,
            catalog: Arc::new(Mutex::new(CatalogStore::new(load))),
            calculator: Arc::new(Mutex::new(CalculatorSession::load(store, clock))),
        }
    }

    /// In-memory state over fixed catalog text; `None` simulates a failed fetch.
    #[cfg(test)]
    pub async fn fake(catalog: Option<&str>) -> Self {
        use crate::catalog::source::fake::FakeSource;
        use crate::nutrition::ledger::test_clock::FixedClock;

        let config = Arc::new(AppConfig {
            catalog_path: "fake.csv".into(),
            storage_path: None,
            suggestion_limit: 20,
        });
        let source = Arc::new(FakeSource(catalog.map(str::to_string))) as Arc<dyn CatalogSource>;
        let clock = Arc::new(FixedClock::new(time::macros::date!(2026 - 10 - 19)));
        Self::from_parts(config, source, Arc::new(MemoryStore::new()), clock).await
    }
}
