use crate::domain::model::BreedRecord;
use crate::utils::error::{Result, StatsError};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.thedogapi.com/v1/breeds";
const API_KEY_HEADER: &str = "x-api-key";

/// Thin wrapper over the breed catalog endpoint. One GET per call, no retry.
#[derive(Debug, Clone)]
pub struct BreedApiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl BreedApiClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_breeds(&self) -> Result<Vec<BreedRecord>> {
        let mut request = self.client.get(&self.endpoint);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        } else {
            tracing::warn!("No API key configured, request may be rate limited or rejected");
        }

        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(StatsError::ApiStatus {
                status: status.as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let json_data: serde_json::Value = response.json().await?;
        parse_records(json_data)
    }
}

/// Deserializes an API payload into breed records. The document must be an
/// array; entries that are not objects are skipped, and a field with a value
/// of the wrong type is read as absent.
pub fn parse_records(json_data: serde_json::Value) -> Result<Vec<BreedRecord>> {
    let serde_json::Value::Array(items) = json_data else {
        return Err(StatsError::ProcessingError {
            message: "expected a JSON array of breeds".to_string(),
        });
    };

    let total = items.len();
    let mut records = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            tracing::warn!("Skipping breed entry {}: not a JSON object", index);
            continue;
        }
        match serde_json::from_value::<BreedRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping breed entry {}: {}", index, e),
        }
    }

    tracing::debug!("Parsed {} of {} breed entries", records.len(), total);
    Ok(records)
}
