//! Concrete adapters for the pipeline's external service ports.

pub mod elasticsearch;
pub mod memory;

pub use elasticsearch::{ElasticsearchEngine, EngineAuth, EngineConfig};
pub use memory::InMemoryCounterStore;
