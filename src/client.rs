//! Client over the OpenSearch transport.

use crate::{
    config::{ClientConfig, ConnectionMode},
    document::Document,
    error::{Error, Result},
    msearch::{MultiSearchRequest, MultiSearchResponse},
};
use opensearch::{
    DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts, UpdateParts,
    auth::Credentials,
    cert::CertificateValidation,
    http::{
        Method, StatusCode, Url,
        headers::{CONTENT_TYPE, HeaderMap, HeaderValue},
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesPutSettingsParts},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// How often the visibility wait re-runs its probe search.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Cluster identity returned by the server-info probe.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterInfo {
    /// Version block.
    pub version: ClusterVersion,
}

/// Version block of the server-info response.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterVersion {
    /// Distribution name; absent on older servers.
    pub distribution: Option<String>,
    /// Version number.
    pub number: String,
}

/// Client for index, document, and multi-search operations.
///
/// The transport and its connection pool are owned by the client and
/// released by `Drop` on every exit path.
#[derive(Clone)]
pub struct SearchClient {
    client: Arc<OpenSearch>,
    config: Arc<ClientConfig>,
}

impl SearchClient {
    /// Connect according to the configuration's transport mode.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let url = Url::parse(&config.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint {}: {}", config.endpoint, e)))?;
        let conn_pool = SingleNodeConnectionPool::new(url);

        let transport = match &config.mode {
            ConnectionMode::SelfHosted { username, password } => {
                info!("Connecting to {} (self-hosted)", config.endpoint);

                let mut builder = TransportBuilder::new(conn_pool)
                    .timeout(config.request_timeout)
                    .disable_proxy();

                if let (Some(user), Some(pass)) = (username, password) {
                    builder = builder.auth(Credentials::Basic(user.clone(), pass.clone()));
                }

                if config.tls.danger_accept_invalid_certs {
                    builder = builder.cert_validation(CertificateValidation::None);
                }

                builder
                    .build()
                    .map_err(|e| Error::Connection(e.to_string()))?
            }

            #[cfg(feature = "aws-auth")]
            ConnectionMode::AwsSigned { service, region } => {
                info!("Connecting to {} ({}, signed)", config.endpoint, region);

                let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(aws_config::Region::new(region.clone()))
                    .load()
                    .await;
                let credentials: Credentials = match sdk_config.clone().try_into() {
                    Ok(credentials) => credentials,
                    Err(e) => return Err(Error::Config(format!("AWS credentials: {:?}", e))),
                };

                TransportBuilder::new(conn_pool)
                    .auth(credentials)
                    .service_name(service)
                    .timeout(config.request_timeout)
                    .build()
                    .map_err(|e| Error::Connection(e.to_string()))?
            }

            #[cfg(not(feature = "aws-auth"))]
            ConnectionMode::AwsSigned { .. } => {
                return Err(Error::Config(
                    "signed mode requires the aws-auth feature".to_string(),
                ));
            }
        };

        debug!("Transport ready");

        Ok(Self {
            client: Arc::new(OpenSearch::new(transport)),
            config: Arc::new(config),
        })
    }

    /// Get the underlying OpenSearch client.
    pub fn inner(&self) -> &OpenSearch {
        &self.client
    }

    /// Get the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Parse a response body, mapping non-success statuses to [`Error::Api`].
    async fn check(response: Response) -> Result<Value> {
        let status = response.status_code();
        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(Error::api(status.as_u16(), &body));
        }

        Ok(body)
    }

    // =========================================================================
    // Cluster Operations
    // =========================================================================

    /// Probe server identity via `GET /`.
    ///
    /// Not supported by OpenSearch Serverless; callers targeting `aoss`
    /// should skip this probe.
    pub async fn info(&self) -> Result<ClusterInfo> {
        let response = self.client.info().send().await?;
        let body = Self::check(response).await?;
        Ok(serde_json::from_value(body)?)
    }

    // =========================================================================
    // Index Operations
    // =========================================================================

    /// Create an index with default settings.
    pub async fn create_index(&self, name: &str) -> Result<()> {
        info!("Creating index: {}", name);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// Create an index, treating "already exists", "request validation
    /// failure", and "creation blocked" classifications as non-fatal.
    ///
    /// Returns `true` when the index was created by this call.
    pub async fn create_index_idempotent(&self, name: &str) -> Result<bool> {
        match self.create_index(name).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_ignorable_create_error() => {
                debug!("Create of index {} skipped: {}", name, e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Update index settings.
    pub async fn put_settings(&self, name: &str, settings: Value) -> Result<()> {
        debug!("Updating settings for index: {}", name);

        let response = self
            .client
            .indices()
            .put_settings(IndicesPutSettingsParts::Index(&[name]))
            .body(settings)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// Delete an index.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        info!("Deleting index: {}", name);

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Err(Error::IndexNotFound(name.to_string()));
        }

        Self::check(response).await?;
        Ok(())
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Index a document with an explicit ID. Returns the server's result
    /// string (`created` or `updated`).
    pub async fn index_doc<T: Document>(&self, id: &str, doc: &T) -> Result<String> {
        let index = T::index_name();
        debug!("Indexing document {} in index {}", id, index);

        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(doc)
            .send()
            .await?;

        let body = Self::check(response).await?;
        Ok(body["result"].as_str().unwrap_or("unknown").to_string())
    }

    /// Update a document by ID with a partial document. Returns the server's
    /// result string (`updated` or `noop`).
    pub async fn update_doc<T: Document>(&self, id: &str, doc: &T) -> Result<String> {
        let index = T::index_name();
        debug!("Updating document {} in index {}", id, index);

        let response = self
            .client
            .update(UpdateParts::IndexId(index, id))
            .body(json!({ "doc": doc }))
            .send()
            .await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Err(Error::DocumentNotFound {
                index: index.to_string(),
                id: id.to_string(),
            });
        }

        let body = Self::check(response).await?;
        Ok(body["result"].as_str().unwrap_or("unknown").to_string())
    }

    /// Get a document by ID.
    pub async fn get_doc<T: Document>(&self, id: &str) -> Result<Option<T>> {
        let index = T::index_name();
        debug!("Getting document {} from index {}", id, index);

        let response = self.client.get(GetParts::IndexId(index, id)).send().await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = Self::check(response).await?;

        if !body["found"].as_bool().unwrap_or(false) {
            return Ok(None);
        }

        let source = body
            .get("_source")
            .ok_or_else(|| Error::Response("No _source in response".to_string()))?;

        Ok(Some(serde_json::from_value(source.clone())?))
    }

    /// Delete a document by ID. Returns `false` when the document did not
    /// exist.
    pub async fn delete_doc(&self, index: &str, id: &str) -> Result<bool> {
        debug!("Deleting document {} from index {}", id, index);

        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        Self::check(response).await?;
        Ok(true)
    }

    // =========================================================================
    // Search Operations
    // =========================================================================

    /// Match-all search over a document type's index, returning the hit
    /// sources.
    pub async fn search_all<T: Document>(&self) -> Result<Vec<T>> {
        let index = T::index_name();
        debug!("Searching index {}", index);

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(json!({ "query": { "match_all": {} } }))
            .send()
            .await?;

        let body = Self::check(response).await?;

        let mut docs = Vec::new();
        if let Some(hits) = body["hits"]["hits"].as_array() {
            for hit in hits {
                let source = hit
                    .get("_source")
                    .ok_or_else(|| Error::Response("Missing _source".to_string()))?;
                docs.push(serde_json::from_value(source.clone())?);
            }
        }

        Ok(docs)
    }

    /// Wait until a document is visible to search, polling at a fixed
    /// interval. Fails with [`Error::Timeout`] when the deadline passes
    /// first.
    pub async fn await_searchable(&self, index: &str, id: &str, timeout: Duration) -> Result<()> {
        debug!("Waiting for document {} in index {} to become searchable", id, index);
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let response = self
                .client
                .search(SearchParts::Index(&[index]))
                .body(json!({ "query": { "ids": { "values": [id] } } }))
                .send()
                .await?;

            if response.status_code().is_success() {
                let body: Value = response.json().await?;
                let found = body["hits"]["hits"]
                    .as_array()
                    .map(|hits| !hits.is_empty())
                    .unwrap_or(false);
                if found {
                    return Ok(());
                }
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(Error::Timeout);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Submit a batch search, serialized through the one newline-delimited
    /// JSON path.
    pub async fn msearch(&self, request: &MultiSearchRequest) -> Result<MultiSearchResponse> {
        debug!("Submitting multi-search batch of {} descriptors", request.len());
        self.msearch_raw(request.to_ndjson()?).await
    }

    /// Submit a caller-assembled newline-delimited JSON batch unchanged.
    ///
    /// The body must end with a newline after the final body line; the
    /// service rejects the batch with HTTP 400 otherwise.
    pub async fn msearch_raw(&self, body: String) -> Result<MultiSearchResponse> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .transport()
            .send(
                Method::Post,
                "/_msearch",
                headers,
                Option::<&Value>::None,
                Some(body),
                None,
            )
            .await?;

        let body = Self::check(response).await?;
        Ok(serde_json::from_value(body)?)
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}
