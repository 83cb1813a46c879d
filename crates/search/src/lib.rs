//! ROMAPI Search Pipeline
//!
//! This crate provides the request-side components of the ROMAPI search
//! service: parameter validation and sanitization, query language
//! detection, rate limiting, geocoding, and search index lifecycle
//! management. An orchestrating request handler composes them per
//! request; each component also stands alone.
//!
//! # Architecture
//!
//! The pipeline is organized into several modules:
//!
//! - [`types`] - Search request, filter and enum types
//! - [`error`] - Error types for all operations
//! - [`core`] - Ports for the external services the pipeline consumes
//!   ([`core::SearchEngineClient`], [`core::CounterStore`],
//!   [`core::GeocodingProvider`])
//! - [`validator`] - Input validation and sanitization
//! - [`language`] - Language detection and analyzer/boost routing
//! - [`ratelimit`] - Fixed- and sliding-window quota enforcement
//! - [`geocode`] - Forward/reverse geocoding with cache and fallbacks
//! - [`index`] - Index lifecycle: creation, health, self-test
//! - [`backend`] - Concrete adapters (Elasticsearch engine, in-memory
//!   counter store)
//!
//! # Design posture
//!
//! Components absorb infrastructure failures rather than propagate them:
//! rate limiting fails open, geocoding resolves to `None` after its
//! fallback chain, and index initialization degrades to a logged warning.
//! Only the validator surfaces a structured, client-visible error.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use romapi_search::ratelimit::{RateLimiter, HOUR};
//! use romapi_search::backend::InMemoryCounterStore;
//! use romapi_search::validator::QueryValidator;
//! use romapi_search::types::SearchRequest;
//!
//! # async fn example() {
//! let validator = QueryValidator::default();
//! let request = SearchRequest {
//!     query: Some("restaurants douala".to_string()),
//!     ..Default::default()
//! };
//! let validated = validator.validate(&request);
//! assert!(validated.is_valid);
//!
//! let limiter = RateLimiter::new(Arc::new(InMemoryCounterStore::new()));
//! let decision = limiter
//!     .check_fixed_window(&RateLimiter::user_key("42"), 1000, HOUR)
//!     .await;
//! assert!(decision.allowed);
//! # }
//! ```

pub mod backend;
pub mod core;
pub mod error;
pub mod geocode;
pub mod index;
pub mod language;
pub mod ratelimit;
pub mod types;
pub mod validator;

pub use error::{SearchError, SearchResult};
pub use geocode::{GeoResolution, GeoResolver, GeoResolverConfig, GeoSource};
pub use index::{IndexHealth, IndexLifecycleConfig, IndexLifecycleManager};
pub use language::{DetectedLanguage, LanguageDetector, SupportedLanguage};
pub use ratelimit::{RateLimitDecision, RateLimiter};
pub use types::{SearchFilters, SearchRequest};
pub use validator::{QueryValidator, ValidationOptions, ValidationResult};
