//! HTTP client for a radiks-server style index.
//!
//! Endpoints, relative to `api_base_url`:
//! - `PUT    /radiks/models/{id}` with the document as JSON body
//! - `GET    /radiks/models/{id}` (404 means absent)
//! - `DELETE /radiks/models/{id}` (404 means already gone)
//! - `GET    /radiks/models/find?<query>` answering `{ "results": [...] }`
//! - `GET    /radiks/models/count?<query>` answering `{ "total": n }`
//!
//! Filters are sent in bracketed query-string form (`$or[0][name]=tester`).
//! No request is retried here.

use crate::error::{StoreError, StoreResult};
use crate::traits::{DocumentStore, QueryService, SigningKeyRegistry};
use async_trait::async_trait;
use radiks_crypto::VerifyingKey;
use radiks_model::{Document, Filter};
use radiks_types::{RecordId, SigningKeyId};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Field of a published signing-key document holding the hex public key.
const PUBLIC_KEY_FIELD: &str = "publicKey";

/// Connection settings for [`RemoteIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteIndexConfig {
    /// Base URL of the index server (e.g. "http://localhost:1260").
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteIndexConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:1260".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize)]
struct FindResponse {
    results: Vec<Value>,
}

#[derive(Deserialize)]
struct CountResponse {
    total: usize,
}

/// Index service reached over HTTP.
pub struct RemoteIndex {
    client: Client,
    config: RemoteIndexConfig,
}

impl RemoteIndex {
    pub fn new(config: RemoteIndexConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RemoteIndexConfig {
        &self.config
    }

    fn model_url(&self, id: &str) -> String {
        format!(
            "{}/radiks/models/{}",
            self.base(),
            urlencoding::encode(id)
        )
    }

    fn query_url(&self, endpoint: &str, filter: &Filter) -> String {
        let query = encode_query(&filter.to_query_pairs());
        if query.is_empty() {
            format!("{}/radiks/models/{endpoint}", self.base())
        } else {
            format!("{}/radiks/models/{endpoint}?{query}", self.base())
        }
    }

    fn base(&self) -> &str {
        self.config.api_base_url.trim_end_matches('/')
    }

    async fn fetch_value(&self, id: &str) -> StoreResult<Option<Value>> {
        let response = self.client.get(self.model_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(ensure_success(response).await?.json().await?))
    }
}

#[async_trait]
impl DocumentStore for RemoteIndex {
    fn backend_name(&self) -> &'static str {
        "remote-index"
    }

    async fn put(&self, doc: &Document) -> StoreResult<()> {
        let body = doc.to_value()?;
        debug!(id = %doc.id, model = %doc.model_type, "PUT document");
        let response = self
            .client
            .put(self.model_url(doc.id.as_str()))
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn get(&self, id: &RecordId) -> StoreResult<Option<Document>> {
        match self.fetch_value(id.as_str()).await? {
            Some(value) => Ok(Some(Document::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        let response = self.client.delete(self.model_url(id.as_str())).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%id, "delete of absent document");
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl QueryService for RemoteIndex {
    async fn query(&self, filter: &Filter) -> StoreResult<Vec<Document>> {
        let response = self.client.get(self.query_url("find", filter)).send().await?;
        let body: FindResponse = ensure_success(response).await?.json().await?;
        body.results
            .into_iter()
            .map(|value| Document::from_value(value).map_err(StoreError::from))
            .collect()
    }

    async fn count(&self, filter: &Filter) -> StoreResult<usize> {
        let url = self.query_url("count", &filter.without_pagination());
        let response = self.client.get(url).send().await?;
        let body: CountResponse = ensure_success(response).await?.json().await?;
        Ok(body.total)
    }
}

/// Signing keys are published in the index as unsigned objects carrying a
/// `publicKey` hex field under the key's id.
#[async_trait]
impl SigningKeyRegistry for RemoteIndex {
    async fn resolve(&self, id: &SigningKeyId) -> StoreResult<Option<VerifyingKey>> {
        let Some(value) = self.fetch_value(id.as_str()).await? else {
            return Ok(None);
        };
        let Some(hex) = value.get(PUBLIC_KEY_FIELD).and_then(Value::as_str) else {
            warn!(%id, "signing key document has no publicKey");
            return Ok(None);
        };
        match VerifyingKey::from_hex(hex) {
            Ok(key) => Ok(Some(key)),
            Err(e) => {
                warn!(%id, error = %e, "published public key is malformed");
                Ok(None)
            }
        }
    }
}

async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Http {
        status: status.as_u16(),
        body,
    })
}

fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
