//! Multi-search request construction and its newline-delimited JSON encoding.
//!
//! A batch is an ordered sequence of descriptors, one per target index,
//! submitted as a single `_msearch` request and answered with one response
//! entry per descriptor in submission order. All serialization goes through
//! [`MultiSearchRequest::to_ndjson`]; there is deliberately no second,
//! hand-maintained encoding of the same wire format.

use crate::fields::FieldRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search type requested in every batch header.
const SEARCH_TYPE: &str = "dfs_query_then_fetch";

/// A prefix-style multi-field match query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiMatchQuery {
    /// Free-text query.
    pub query: String,
    /// Match type.
    #[serde(rename = "type")]
    pub match_type: String,
    /// Fields to match against, in boost-relevant order.
    pub fields: Vec<String>,
    /// Term combination operator.
    pub operator: String,
}

impl MultiMatchQuery {
    /// Build a `bool_prefix` multi-match over the given fields, combining
    /// terms with `and`.
    pub fn bool_prefix(query: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            query: query.into(),
            match_type: "bool_prefix".to_string(),
            fields,
            operator: "and".to_string(),
        }
    }
}

/// One query to run against one index within a batch.
///
/// Descriptors are immutable once constructed and discarded after
/// serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchDescriptor {
    /// Target index name.
    pub index: String,
    /// The query to run.
    pub query: MultiMatchQuery,
    /// Whether the engine should compute and return relevance scores.
    pub track_scores: bool,
}

impl SearchDescriptor {
    /// Build a descriptor for one index: free text matched as a prefix
    /// across the registry's field list for that index, with score tracking
    /// enabled.
    pub fn new(index: impl Into<String>, input: impl Into<String>, registry: &FieldRegistry) -> Self {
        let index = index.into();
        let fields = registry.lookup(&index).to_vec();
        Self {
            query: MultiMatchQuery::bool_prefix(input, fields),
            index,
            track_scores: true,
        }
    }
}

/// Header line of one (header, body) pair.
#[derive(Serialize)]
struct HeaderLine<'a> {
    index: &'a str,
    search_type: &'a str,
}

/// Body line of one (header, body) pair.
#[derive(Serialize)]
struct BodyLine<'a> {
    track_scores: bool,
    query: QueryClause<'a>,
}

#[derive(Serialize)]
struct QueryClause<'a> {
    multi_match: &'a MultiMatchQuery,
}

/// An ordered batch of search descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSearchRequest {
    descriptors: Vec<SearchDescriptor>,
}

impl MultiSearchRequest {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a batch from an ordered index list and one shared query text.
    ///
    /// Output order matches input order; repeated index names produce
    /// repeated descriptors.
    pub fn build(indices: &[&str], input: &str, registry: &FieldRegistry) -> Self {
        let mut request = Self::new();
        for index in indices {
            request.push(SearchDescriptor::new(*index, input, registry));
        }
        request
    }

    /// Append a descriptor to the batch.
    pub fn push(&mut self, descriptor: SearchDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// The descriptors in submission order.
    pub fn descriptors(&self) -> &[SearchDescriptor] {
        &self.descriptors
    }

    /// Number of descriptors in the batch.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Serialize the batch as newline-delimited JSON: one header line and
    /// one body line per descriptor, every line newline-terminated.
    ///
    /// The terminator after the final body line is part of the wire
    /// contract: the service rejects a batch without it with HTTP 400 and
    /// reason `The msearch request must be terminated by a newline [\n]`.
    pub fn to_ndjson(&self) -> crate::Result<String> {
        let mut out = String::new();
        for descriptor in &self.descriptors {
            out.push_str(&serde_json::to_string(&HeaderLine {
                index: &descriptor.index,
                search_type: SEARCH_TYPE,
            })?);
            out.push('\n');
            out.push_str(&serde_json::to_string(&BodyLine {
                track_scores: descriptor.track_scores,
                query: QueryClause {
                    multi_match: &descriptor.query,
                },
            })?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Response to a batch submission: one entry per descriptor, in submission
/// order.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiSearchResponse {
    /// Time the batch took, in milliseconds.
    #[serde(default)]
    pub took: Option<u64>,
    /// Per-descriptor responses.
    pub responses: Vec<Value>,
}
