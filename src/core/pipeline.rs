use crate::adapters::cache::RecordCache;
use crate::adapters::http::BreedApiClient;
use crate::core::analysis::{analyze, AnalysisOptions};
use crate::core::export::{render_files, zip_files, BUNDLE_FILENAME};
use crate::core::{BreedRecord, BreedTables, ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use tokio::sync::Mutex;

const CACHE_KEY: &str = "breeds";

pub struct BreedPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: BreedApiClient,
    cache: Mutex<RecordCache>,
}

impl<S: Storage, C: ConfigProvider> BreedPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = BreedApiClient::new(
            config.api_endpoint(),
            config.api_key().map(str::to_string),
            config.request_timeout(),
        )?;
        let cache = Mutex::new(RecordCache::new(config.cache_ttl()));

        Ok(Self {
            storage,
            config,
            client,
            cache,
        })
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            malformed: self.config.malformed_policy(),
            trait_name: self.config.trait_name().map(str::to_string),
        }
    }

    /// Forces the next `extract` to hit the API.
    pub async fn invalidate_cache(&self) -> bool {
        self.cache
            .lock()
            .await
            .invalidate(self.client.endpoint(), CACHE_KEY)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BreedPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<BreedRecord>> {
        let mut cache = self.cache.lock().await;

        if let Some(records) = cache.get(self.client.endpoint(), CACHE_KEY) {
            tracing::debug!("Using {} cached breed records", records.len());
            return Ok(records.to_vec());
        }

        tracing::info!("🌐 Fetching breeds from: {}", self.client.endpoint());
        let records = self.client.fetch_breeds().await?;
        cache.insert(self.client.endpoint(), CACHE_KEY, records.clone());

        Ok(records)
    }

    async fn transform(&self, records: Vec<BreedRecord>) -> Result<BreedTables> {
        analyze(&records, &self.analysis_options())
    }

    async fn load(&self, tables: BreedTables) -> Result<String> {
        let output_path = format!("{}/{}", self.config.output_path(), BUNDLE_FILENAME);

        let files = render_files(
            &tables,
            self.config.api_endpoint(),
            self.config.output_formats(),
            chrono::Utc::now(),
        )?;
        tracing::debug!("Creating ZIP file with {} files", files.len());

        let zip_data = zip_files(&files)?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(BUNDLE_FILENAME, &zip_data).await?;

        Ok(output_path)
    }
}
