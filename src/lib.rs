//! Demo client for OpenSearch.
//!
//! This crate wraps the official `opensearch` client with a small typed
//! surface covering:
//! - Index lifecycle (create, settings, delete) with idempotent creation
//! - Document indexing, update, retrieval, and deletion
//! - Batched multi-search (`_msearch`) with an order-preserving request
//!   builder and a single newline-delimited JSON serialization path
//! - Self-hosted transports (optional basic auth, insecure-localhost TLS)
//!   and AWS SigV4-signed transports
//!
//! # Example
//!
//! ```rust,no_run
//! use opensearch_demo::{ClientConfig, FieldRegistry, MultiSearchRequest, SearchClient};
//!
//! #[tokio::main]
//! async fn main() -> opensearch_demo::Result<()> {
//!     let client = SearchClient::connect(ClientConfig::from_env()).await?;
//!
//!     let registry = FieldRegistry::demo();
//!     let request = MultiSearchRequest::build(&["index1", "index2", "index3"], "AA", &registry);
//!     let response = client.msearch(&request).await?;
//!     println!("{} responses", response.responses.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod document;
mod error;
mod fields;
mod msearch;

pub mod demo;

pub use client::{ClusterInfo, ClusterVersion, SearchClient};
pub use config::{ClientConfig, ConnectionMode, TlsOptions};
pub use document::Document;
pub use error::{Error, Result};
pub use fields::FieldRegistry;
pub use msearch::{MultiMatchQuery, MultiSearchRequest, MultiSearchResponse, SearchDescriptor};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ClientConfig, Document, Error, FieldRegistry, MultiSearchRequest, Result, SearchClient,
    };
}
