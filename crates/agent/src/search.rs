use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use statusbot_core::config::SearchConfig;
use statusbot_core::{ApplicationError, ExecutionRecord, QueryExpression};

/// The external execution index. One query per confirmed flow; no retry
/// policy is applied here (failures surface as `ApplicationError::Search`).
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(
        &self,
        query: &QueryExpression,
    ) -> Result<Vec<ExecutionRecord>, ApplicationError>;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<serde_json::Value>,
}

/// HTTP client for the execution index. Raw records are validated into
/// [`ExecutionRecord`] at this boundary; a malformed record fails the run
/// rather than silently skewing the tally.
pub struct HttpSearchIndex {
    client: reqwest::Client,
    search_url: String,
    api_key: String,
}

impl HttpSearchIndex {
    pub fn from_config(config: &SearchConfig) -> Result<Self, ApplicationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ApplicationError::Search(error.to_string()))?;

        Ok(Self {
            client,
            search_url: format!(
                "{}/indexes/{}/docs/search",
                config.endpoint.trim_end_matches('/'),
                config.index_name
            ),
            api_key: config.api_key.expose_secret().to_string(),
        })
    }
}

#[async_trait]
impl SearchIndex for HttpSearchIndex {
    async fn search(
        &self,
        query: &QueryExpression,
    ) -> Result<Vec<ExecutionRecord>, ApplicationError> {
        let response = self
            .client
            .post(&self.search_url)
            .header("api-key", &self.api_key)
            .json(&SearchRequest { search: query.as_str() })
            .send()
            .await
            .map_err(|error| ApplicationError::Search(error.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|error| ApplicationError::Search(error.to_string()))?;

        let payload: SearchResponse = response
            .json()
            .await
            .map_err(|error| ApplicationError::Search(error.to_string()))?;

        payload
            .value
            .iter()
            .map(|raw| {
                ExecutionRecord::from_value(raw)
                    .map_err(|error| ApplicationError::Search(error.to_string()))
            })
            .collect()
    }
}

/// In-memory index for tests and local simulation. Records every received
/// query expression so callers can assert on what was issued.
#[derive(Default)]
pub struct StaticSearchIndex {
    records: Vec<ExecutionRecord>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearchIndex {
    pub fn new(records: Vec<ExecutionRecord>) -> Self {
        Self { records, queries: Mutex::new(Vec::new()) }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|queries| queries.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SearchIndex for StaticSearchIndex {
    async fn search(
        &self,
        query: &QueryExpression,
    ) -> Result<Vec<ExecutionRecord>, ApplicationError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.as_str().to_string());
        }
        Ok(self.records.clone())
    }
}

/// Index stub that always fails; used to exercise the degraded path.
#[derive(Default)]
pub struct FailingSearchIndex;

#[async_trait]
impl SearchIndex for FailingSearchIndex {
    async fn search(
        &self,
        _query: &QueryExpression,
    ) -> Result<Vec<ExecutionRecord>, ApplicationError> {
        Err(ApplicationError::Search("execution index is unreachable".to_string()))
    }
}
