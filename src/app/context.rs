use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{BattlecardError, Result};
use crate::config::Config;
use crate::extractor::{AnthropicExtractor, Extractor};
use crate::fetcher::{BrowserlessRenderer, ContentFetcher, JinaReader};
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub fetcher: ContentFetcher,
    pub config: Config,
    extractor: Option<Arc<dyn Extractor>>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let reader = Arc::new(JinaReader::new(
            config.fetcher.reader_endpoint.clone(),
            config.fetcher.timeout_secs,
        ));
        let renderer = Arc::new(BrowserlessRenderer::new(
            config.renderer.endpoint.clone(),
            config.renderer.token.clone(),
            config.renderer.wait_for_ms,
        ));
        let fetcher = ContentFetcher::new(reader, renderer);

        let extractor: Option<Arc<dyn Extractor>> =
            config.extraction.api_key.as_ref().map(|key| {
                Arc::new(AnthropicExtractor::new(
                    key.clone(),
                    config.extraction.model.clone(),
                    config.extraction.max_tokens,
                )) as Arc<dyn Extractor>
            });

        Ok(Self {
            store,
            fetcher,
            config,
            extractor,
        })
    }

    /// The extraction client, or a configuration error when no API key is
    /// available.
    pub fn extractor(&self) -> Result<Arc<dyn Extractor>> {
        self.extractor.clone().ok_or_else(|| {
            BattlecardError::Config(
                "No extraction API key configured. Set ANTHROPIC_API_KEY or extraction.api_key."
                    .into(),
            )
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| BattlecardError::Config("Could not find data directory".into()))?;
        let battlecard_dir = data_dir.join("battlecard");
        std::fs::create_dir_all(&battlecard_dir)?;
        Ok(battlecard_dir.join("battlecard.db"))
    }
}
