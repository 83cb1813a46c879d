//! Index lifecycle: startup initialization, mapping upkeep, health and
//! self-test probes.
//!
//! Initialization is deliberately non-fatal: it runs in the background
//! after a short settling delay, retries with exponential backoff, and on
//! exhaustion logs a degraded-mode warning instead of failing startup.
//! Search then runs against whatever indices exist.

mod retry;

pub use retry::RetryPolicy;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use uuid::Uuid;

use crate::core::SearchEngineClient;
use crate::error::{ConfigError, EngineResult, SearchResult};

/// Mapping/settings definition shipped with the crate, used when no
/// definition file is configured.
const DEFAULT_DEFINITION: &str = include_str!("../../config/index-mappings.json");

/// A logical index and its friendly alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub alias: Option<String>,
}

/// Lifecycle settings.
#[derive(Debug, Clone)]
pub struct IndexLifecycleConfig {
    /// Prefix for all index names (`{prefix}_resources`, ...).
    pub index_prefix: String,
    /// Definition file overriding the embedded default.
    pub mapping_path: Option<PathBuf>,
    /// Settling delay before background initialization starts.
    pub startup_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for IndexLifecycleConfig {
    fn default() -> Self {
        Self {
            index_prefix: "romapi".to_string(),
            mapping_path: None,
            startup_delay: Duration::from_secs(2),
            retry: RetryPolicy::default(),
        }
    }
}

/// Shard counters from cluster health.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardCounts {
    pub active: u64,
    pub primary: u64,
    pub relocating: u64,
    pub initializing: u64,
    pub unassigned: u64,
}

/// Health and size statistics for one index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHealth {
    pub name: String,
    /// Cluster status for the index: "green", "yellow" or "red".
    pub status: String,
    pub docs_count: u64,
    pub store_size_bytes: u64,
    pub shards: ShardCounts,
}

/// Aggregate cluster summary for dashboards.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    pub status: String,
    pub node_count: u64,
    pub index_count: u64,
    pub docs_count: u64,
}

/// Manages the platform's search indices against a [`SearchEngineClient`].
pub struct IndexLifecycleManager {
    engine: Arc<dyn SearchEngineClient>,
    config: IndexLifecycleConfig,
}

impl IndexLifecycleManager {
    pub fn new(engine: Arc<dyn SearchEngineClient>, config: IndexLifecycleConfig) -> Self {
        Self { engine, config }
    }

    /// The indices this deployment requires.
    pub fn required_indices(&self) -> Vec<IndexDescriptor> {
        let prefix = &self.config.index_prefix;
        vec![
            IndexDescriptor {
                name: format!("{prefix}_resources"),
                alias: Some(format!("{prefix}_resources_alias")),
            },
            IndexDescriptor {
                name: format!("{prefix}_suggestions"),
                alias: Some(format!("{prefix}_suggestions_alias")),
            },
        ]
    }

    /// Background initialization: wait out the settling delay, then retry
    /// [`ensure_indices_exist`](Self::ensure_indices_exist) per the retry
    /// policy. Exhaustion logs a degraded-mode warning; it never fails the
    /// process.
    pub fn spawn_initialization(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(manager.config.startup_delay).await;

            let policy = manager.config.retry;
            for attempt in 0..policy.max_attempts {
                tracing::info!(
                    attempt = attempt + 1,
                    max = policy.max_attempts,
                    "initializing search indices"
                );
                match manager.ensure_indices_exist().await {
                    Ok(()) => {
                        tracing::info!("search indices initialized");
                        return;
                    }
                    Err(error) => {
                        tracing::warn!(attempt = attempt + 1, %error, "index initialization failed");
                        if attempt + 1 < policy.max_attempts {
                            tokio::time::sleep(policy.delay_for(attempt)).await;
                        }
                    }
                }
            }
            tracing::warn!(
                "index initialization exhausted retries, search running in degraded mode"
            );
        })
    }

    /// Ensure every required index exists with current mappings. Errors
    /// propagate so the retry loop can try again.
    pub async fn ensure_indices_exist(&self) -> SearchResult<()> {
        self.engine.ping().await?;
        for descriptor in self.required_indices() {
            self.ensure_index_exists(&descriptor).await?;
        }
        Ok(())
    }

    /// Create one index (with alias) if missing; otherwise attempt a
    /// non-destructive mapping update. Calling this twice for the same
    /// missing index creates it exactly once.
    pub async fn ensure_index_exists(&self, descriptor: &IndexDescriptor) -> SearchResult<()> {
        if self.engine.index_exists(&descriptor.name).await? {
            // Often a no-op rejected by the engine, hence best-effort
            let definition = self.load_definition()?;
            if let Some(mappings) = definition.get("mappings").cloned() {
                if let Err(error) = self.engine.put_mapping(&descriptor.name, mappings).await {
                    tracing::debug!(index = %descriptor.name, %error, "mapping update skipped");
                }
            }
            return Ok(());
        }

        tracing::info!(index = %descriptor.name, "creating index");
        self.engine
            .create_index(&descriptor.name, self.load_definition()?)
            .await?;
        if let Some(alias) = &descriptor.alias {
            self.engine.put_alias(&descriptor.name, alias).await?;
            tracing::info!(index = %descriptor.name, %alias, "alias bound");
        }
        Ok(())
    }

    /// Delete and recreate an index from the current definition. Used for
    /// schema migrations; destroys all documents in the index.
    pub async fn recreate_index(&self, name: &str) -> SearchResult<()> {
        if self.engine.index_exists(name).await? {
            self.engine.delete_index(name).await?;
            tracing::info!(index = %name, "deleted index for recreation");
        }
        self.engine.create_index(name, self.load_definition()?).await?;
        tracing::info!(index = %name, "recreated index");
        Ok(())
    }

    /// Health, shard counts and size statistics for one index.
    pub async fn index_health(&self, name: &str) -> EngineResult<IndexHealth> {
        let stats = self.engine.index_stats(name).await?;
        let health = self.engine.cluster_health(Some(name)).await?;

        let totals = &stats["indices"][name]["total"];
        Ok(IndexHealth {
            name: name.to_string(),
            status: health["status"].as_str().unwrap_or("red").to_string(),
            docs_count: totals["docs"]["count"].as_u64().unwrap_or(0),
            store_size_bytes: totals["store"]["size_in_bytes"].as_u64().unwrap_or(0),
            shards: ShardCounts {
                active: health["active_shards"].as_u64().unwrap_or(0),
                primary: health["active_primary_shards"].as_u64().unwrap_or(0),
                relocating: health["relocating_shards"].as_u64().unwrap_or(0),
                initializing: health["initializing_shards"].as_u64().unwrap_or(0),
                unassigned: health["unassigned_shards"].as_u64().unwrap_or(0),
            },
        })
    }

    /// Cluster-wide summary for operational dashboards.
    pub async fn cluster_summary(&self) -> EngineResult<ClusterSummary> {
        let health = self.engine.cluster_health(None).await?;
        let stats = self.engine.cluster_stats().await?;
        Ok(ClusterSummary {
            status: health["status"].as_str().unwrap_or("red").to_string(),
            node_count: stats["nodes"]["count"]["total"].as_u64().unwrap_or(0),
            index_count: stats["indices"]["count"].as_u64().unwrap_or(0),
            docs_count: stats["indices"]["docs"]["count"].as_u64().unwrap_or(0),
        })
    }

    /// Round-trip self-test: index a probe document, search it back,
    /// delete it. Returns pass/fail and never errors to the caller.
    pub async fn test_index(&self, name: &str) -> bool {
        let probe_id = format!("probe-{}", Uuid::new_v4());
        let probe = json!({
            "id": probe_id,
            "name": "Probe Document",
            "description": "Synthetic document verifying round-trip indexing",
            "category": {"id": "probe-category", "name": "Probe", "slug": "probe"},
            "resourceType": "API",
            "verified": true,
            "createdAt": chrono::Utc::now().to_rfc3339(),
        });

        match self.run_probe(name, &probe_id, probe).await {
            Ok(found) => {
                tracing::info!(index = %name, passed = found, "index self-test finished");
                found
            }
            Err(error) => {
                tracing::error!(index = %name, %error, "index self-test failed");
                false
            }
        }
    }

    async fn run_probe(&self, name: &str, probe_id: &str, probe: Value) -> EngineResult<bool> {
        self.engine.index_document(name, probe_id, probe, true).await?;

        let result = self
            .engine
            .search(name, json!({"query": {"match": {"name": "Probe Document"}}}))
            .await?;

        self.engine.delete_document(name, probe_id, true).await?;

        // hits.total is either a bare number or {value, relation}
        let total = &result["hits"]["total"];
        let hits = total
            .as_u64()
            .or_else(|| total["value"].as_u64())
            .unwrap_or(0);
        Ok(hits > 0)
    }

    /// Load the mapping/settings definition, re-reading any configured
    /// file so edits take effect without a restart.
    fn load_definition(&self) -> Result<Value, ConfigError> {
        match &self.config.mapping_path {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::MappingFile {
                        path: path.clone(),
                        source,
                    })?;
                Ok(serde_json::from_str(&content)?)
            }
            None => Ok(serde_json::from_str(DEFAULT_DEFINITION)?),
        }
    }
}
