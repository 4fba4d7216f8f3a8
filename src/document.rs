//! Document trait.

use serde::{Serialize, de::DeserializeOwned};

/// Trait for documents that can be indexed in OpenSearch.
///
/// # Example
///
/// ```rust
/// use opensearch_demo::Document;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Article {
///     title: String,
///     body: String,
/// }
///
/// impl Document for Article {
///     fn index_name() -> &'static str {
///         "articles"
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Returns the index name for this document type.
    fn index_name() -> &'static str;
}
