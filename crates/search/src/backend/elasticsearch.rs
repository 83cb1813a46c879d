//! Elasticsearch adapter for the [`SearchEngineClient`] port.

use async_trait::async_trait;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::cluster::{ClusterHealthParts, ClusterStatsParts};
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesPutAliasParts,
    IndicesPutMappingParts, IndicesRefreshParts, IndicesStatsParts,
};
use elasticsearch::params::Refresh;
use elasticsearch::{DeleteParts, Elasticsearch, IndexParts, SearchParts};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::core::SearchEngineClient;
use crate::error::{EngineError, EngineResult};

/// Authentication configuration for the search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineAuth {
    /// Basic username/password authentication.
    Basic { username: String, password: String },
    /// Bearer token authentication.
    Bearer { token: String },
}

/// Connection configuration for the Elasticsearch engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Node URLs (e.g. `["http://localhost:9200"]`). Currently uses the
    /// first node (single-node connection pool).
    pub nodes: Vec<String>,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<EngineAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

/// [`SearchEngineClient`] implementation over the official Elasticsearch
/// transport.
pub struct ElasticsearchEngine {
    client: Elasticsearch,
}

impl ElasticsearchEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Ok(Self {
            client: build_client(&config)?,
        })
    }

    /// Fails non-success responses into [`EngineError::Request`], keeping
    /// whatever body text the engine returned as the message.
    async fn check(
        operation: &'static str,
        index: &str,
        response: Response,
    ) -> EngineResult<Response> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(EngineError::Request {
            operation,
            index: index.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn parse(response: Response) -> EngineResult<Value> {
        response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse {
                message: e.to_string(),
            })
    }
}

fn build_client(config: &EngineConfig) -> EngineResult<Elasticsearch> {
    let url = config
        .nodes
        .first()
        .cloned()
        .unwrap_or_else(|| "http://localhost:9200".to_string());

    let parsed_url: elasticsearch::http::Url = url.parse().map_err(|e| EngineError::Client {
        message: format!("invalid node URL {url}: {e}"),
    })?;

    let conn_pool = SingleNodeConnectionPool::new(parsed_url);

    let mut builder = TransportBuilder::new(conn_pool)
        .timeout(Duration::from_millis(config.request_timeout_ms));

    if config.disable_certificate_validation {
        builder = builder.cert_validation(CertificateValidation::None);
    }

    if let Some(ref auth) = config.auth {
        builder = match auth {
            EngineAuth::Basic { username, password } => {
                builder.auth(Credentials::Basic(username.clone(), password.clone()))
            }
            EngineAuth::Bearer { token } => builder.auth(Credentials::Bearer(token.clone())),
        };
    }

    let transport = builder.build().map_err(|e| EngineError::Client {
        message: format!("failed to build transport: {e}"),
    })?;

    Ok(Elasticsearch::new(transport))
}

fn transport_err(e: elasticsearch::Error) -> EngineError {
    EngineError::Unavailable {
        message: e.to_string(),
    }
}

#[async_trait]
impl SearchEngineClient for ElasticsearchEngine {
    async fn ping(&self) -> EngineResult<()> {
        let response = self.client.ping().send().await.map_err(transport_err)?;
        Self::check("ping", "", response).await?;
        Ok(())
    }

    async fn cluster_health(&self, index: Option<&str>) -> EngineResult<Value> {
        let scoped = index.map(|i| [i]);
        let parts = match &scoped {
            Some(indices) => ClusterHealthParts::Index(indices),
            None => ClusterHealthParts::None,
        };
        let response = self
            .client
            .cluster()
            .health(parts)
            .send()
            .await
            .map_err(transport_err)?;
        let response = Self::check("cluster_health", index.unwrap_or(""), response).await?;
        Self::parse(response).await
    }

    async fn cluster_stats(&self) -> EngineResult<Value> {
        let response = self
            .client
            .cluster()
            .stats(ClusterStatsParts::None)
            .send()
            .await
            .map_err(transport_err)?;
        let response = Self::check("cluster_stats", "", response).await?;
        Self::parse(response).await
    }

    async fn index_exists(&self, index: &str) -> EngineResult<bool> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_err)?;
        let status = response.status_code();
        if status.is_success() {
            Ok(true)
        } else if status.as_u16() == 404 {
            Ok(false)
        } else {
            Self::check("index_exists", index, response).await?;
            Ok(false)
        }
    }

    async fn create_index(&self, index: &str, definition: Value) -> EngineResult<()> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(definition)
            .send()
            .await
            .map_err(transport_err)?;
        Self::check("create_index", index, response).await?;
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> EngineResult<()> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_err)?;
        Self::check("delete_index", index, response).await?;
        Ok(())
    }

    async fn put_alias(&self, index: &str, alias: &str) -> EngineResult<()> {
        let response = self
            .client
            .indices()
            .put_alias(IndicesPutAliasParts::IndexName(&[index], alias))
            .send()
            .await
            .map_err(transport_err)?;
        Self::check("put_alias", index, response).await?;
        Ok(())
    }

    async fn put_mapping(&self, index: &str, mappings: Value) -> EngineResult<()> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(mappings)
            .send()
            .await
            .map_err(transport_err)?;
        Self::check("put_mapping", index, response).await?;
        Ok(())
    }

    async fn index_stats(&self, index: &str) -> EngineResult<Value> {
        let response = self
            .client
            .indices()
            .stats(IndicesStatsParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_err)?;
        let response = Self::check("index_stats", index, response).await?;
        Self::parse(response).await
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: Value,
        refresh: bool,
    ) -> EngineResult<()> {
        let mut request = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(document);
        if refresh {
            request = request.refresh(Refresh::True);
        }
        let response = request.send().await.map_err(transport_err)?;
        Self::check("index_document", index, response).await?;
        Ok(())
    }

    async fn delete_document(&self, index: &str, id: &str, refresh: bool) -> EngineResult<()> {
        let mut request = self.client.delete(DeleteParts::IndexId(index, id));
        if refresh {
            request = request.refresh(Refresh::True);
        }
        let response = request.send().await.map_err(transport_err)?;
        Self::check("delete_document", index, response).await?;
        Ok(())
    }

    async fn search(&self, index: &str, body: Value) -> EngineResult<Value> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(transport_err)?;
        let response = Self::check("search", index, response).await?;
        Self::parse(response).await
    }

    async fn refresh(&self, index: &str) -> EngineResult<()> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_err)?;
        Self::check("refresh", index, response).await?;
        Ok(())
    }
}
