use crate::core::analysis::MalformedRangePolicy;
use crate::core::export::OutputFormats;
use crate::domain::model::{BreedRecord, BreedTables};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn trait_name(&self) -> Option<&str>;
    fn malformed_policy(&self) -> MalformedRangePolicy;
    fn output_formats(&self) -> OutputFormats;
    fn cache_ttl(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<BreedRecord>>;
    async fn transform(&self, records: Vec<BreedRecord>) -> Result<BreedTables>;
    async fn load(&self, tables: BreedTables) -> Result<String>;
}
