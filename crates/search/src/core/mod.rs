//! Ports onto the pipeline's external collaborators.
//!
//! The pipeline never talks to infrastructure directly; each component
//! receives one of these traits at construction:
//!
//! - [`SearchEngineClient`] - full-text index lifecycle and documents
//! - [`CounterStore`] - atomic counters and sorted sets for quotas
//! - [`GeocodingProvider`] - forward/reverse address resolution
//!
//! Concrete adapters live in [`crate::backend`] (Elasticsearch, in-memory
//! counter store) and [`crate::geocode`] (Nominatim).

mod engine;
mod geo;
mod store;

pub use engine::SearchEngineClient;
pub use geo::{GeocodingProvider, PlaceAddress, ProviderPlace};
pub use store::CounterStore;
