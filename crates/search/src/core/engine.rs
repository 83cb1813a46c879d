//! Search engine client port.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::EngineResult;

/// Operations the pipeline needs from the backing search engine.
///
/// Bodies and responses are opaque JSON: the mapping definition is loaded
/// configuration, and response parsing is left to the callers that know
/// which fragments they need.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Cheap connectivity probe.
    async fn ping(&self) -> EngineResult<()>;

    /// Cluster health, optionally scoped to a single index.
    async fn cluster_health(&self, index: Option<&str>) -> EngineResult<Value>;

    /// Cluster-wide statistics (node counts, index totals).
    async fn cluster_stats(&self) -> EngineResult<Value>;

    async fn index_exists(&self, index: &str) -> EngineResult<bool>;

    /// Create an index from a settings+mappings definition.
    async fn create_index(&self, index: &str, definition: Value) -> EngineResult<()>;

    /// Delete an index. Destructive; callers gate this explicitly.
    async fn delete_index(&self, index: &str) -> EngineResult<()>;

    /// Bind a friendly alias to an index.
    async fn put_alias(&self, index: &str, alias: &str) -> EngineResult<()>;

    /// Non-destructive mapping update (new fields only).
    async fn put_mapping(&self, index: &str, mappings: Value) -> EngineResult<()>;

    /// Document and storage statistics for one index.
    async fn index_stats(&self, index: &str) -> EngineResult<Value>;

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: Value,
        refresh: bool,
    ) -> EngineResult<()>;

    async fn delete_document(&self, index: &str, id: &str, refresh: bool) -> EngineResult<()>;

    /// Execute a search body and return the raw response.
    async fn search(&self, index: &str, body: Value) -> EngineResult<Value>;

    /// Make recently indexed documents searchable.
    async fn refresh(&self, index: &str) -> EngineResult<()>;
}
