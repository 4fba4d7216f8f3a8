//! Index-to-field mapping for multi-search queries.

use std::collections::HashMap;

/// Registry mapping an index name to the ordered list of fields a free-text
/// query should match against.
///
/// Field names may carry `^boost` suffixes (`"title^2"`); list order is
/// preserved because relative position affects boost weighting.
///
/// Lookups are exact and case-sensitive. An index with no registered entry
/// resolves to an empty field list rather than an error, so a query against
/// it simply matches nothing.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: HashMap<String, Vec<String>>,
}

impl FieldRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the fixed demo table.
    pub fn demo() -> Self {
        Self::new()
            .with_index("index1", &["field11"])
            .with_index("index2", &["field21", "field22"])
            .with_index("index3", &["field31"])
    }

    /// Register the searchable fields for an index.
    pub fn with_index(mut self, index: impl Into<String>, fields: &[&str]) -> Self {
        self.register(index, fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Register the searchable fields for an index, replacing any existing entry.
    pub fn register(&mut self, index: impl Into<String>, fields: Vec<String>) {
        self.fields.insert(index.into(), fields);
    }

    /// Resolve the field list for an index. Unknown names resolve to an
    /// empty list.
    pub fn lookup(&self, index: &str) -> &[String] {
        self.fields.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of registered indices.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_table_lookups() {
        let registry = FieldRegistry::demo();
        assert_eq!(registry.lookup("index1"), ["field11"]);
        assert_eq!(registry.lookup("index2"), ["field21", "field22"]);
        assert_eq!(registry.lookup("index3"), ["field31"]);
    }

    #[test]
    fn test_unknown_index_resolves_empty() {
        let registry = FieldRegistry::demo();
        assert!(registry.lookup("index4").is_empty());
        assert!(registry.lookup("").is_empty());
        // Case-sensitive: no fuzzy matching.
        assert!(registry.lookup("Index1").is_empty());
    }

    #[test]
    fn test_field_order_preserved() {
        let registry = FieldRegistry::new().with_index("articles", &["title^2", "body", "tags"]);
        assert_eq!(registry.lookup("articles"), ["title^2", "body", "tags"]);
    }

    #[test]
    fn test_register_replaces_entry() {
        let mut registry = FieldRegistry::new().with_index("articles", &["title"]);
        registry.register("articles", vec!["body".to_string()]);
        assert_eq!(registry.lookup("articles"), ["body"]);
        assert_eq!(registry.len(), 1);
    }
}
