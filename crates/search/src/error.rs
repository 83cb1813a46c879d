//! Error types for the search pipeline.
//!
//! This module defines all error types used throughout the pipeline,
//! following a hierarchy that separates client input errors, search engine
//! errors, counter store errors, and geocoding errors.
//!
//! Only [`SearchError::InvalidParams`] is ever surfaced to a client; the
//! infrastructure categories are absorbed by the components that produce
//! them (fail-open rate limiting, degraded-mode index lifecycle, null
//! geocoding results) and exist so adapters can report precise causes.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for all pipeline operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Rejected search parameters, carrying the validator's structured
    /// error and warning lists.
    #[error("invalid search parameters: {}", errors.join(", "))]
    InvalidParams {
        errors: Vec<String>,
        warnings: Vec<String>,
    },

    /// Search engine errors
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Counter store errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Geocoding provider errors
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from the search engine client.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine could not be reached.
    #[error("search engine unavailable: {message}")]
    Unavailable { message: String },

    /// An engine request completed with a non-success status.
    #[error("search engine request failed ({operation} on {index}, status {status}): {message}")]
    Request {
        operation: &'static str,
        index: String,
        status: u16,
        message: String,
    },

    /// A response body could not be parsed.
    #[error("failed to parse search engine response: {message}")]
    InvalidResponse { message: String },

    /// Client construction failed (bad node URL, TLS setup).
    #[error("failed to build search engine client: {message}")]
    Client { message: String },
}

/// Errors from the shared counter store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or the command failed in transit.
    #[error("counter store unavailable: {message}")]
    Unavailable { message: String },

    /// The store returned a value of an unexpected shape.
    #[error("unexpected counter store reply for {key}: {message}")]
    UnexpectedReply { key: String, message: String },
}

/// Errors from the geocoding provider.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// HTTP transport failure.
    #[error("geocoding provider unreachable: {message}")]
    Unreachable { message: String },

    /// The provider answered with a non-success status.
    #[error("geocoding provider error (status {status})")]
    Provider { status: u16 },

    /// The provider's response could not be parsed.
    #[error("failed to parse geocoding response: {message}")]
    InvalidResponse { message: String },
}

/// Configuration and definition-file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The index mapping/settings definition file could not be read.
    #[error("failed to read mapping definition {path}: {source}")]
    MappingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mapping definition is not valid JSON.
    #[error("invalid mapping definition: {source}")]
    MappingParse {
        #[from]
        source: serde_json::Error,
    },
}

/// Result type alias for pipeline operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type alias for counter store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_params_joins_errors() {
        let err = SearchError::InvalidParams {
            errors: vec!["query too long".to_string(), "bad facet".to_string()],
            warnings: vec![],
        };
        let msg = err.to_string();
        assert!(msg.contains("query too long"));
        assert!(msg.contains("bad facet"));
    }

    #[test]
    fn test_engine_error_wraps_transparently() {
        let err: SearchError = EngineError::Unavailable {
            message: "connection refused".to_string(),
        }
        .into();
        assert!(err.to_string().contains("connection refused"));
    }
}
