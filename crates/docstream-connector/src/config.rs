//! Table configuration

use crate::error::StoreError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration for a document-store backed table.
///
/// # Example
///
/// ```rust
/// use docstream_connector::TableConfig;
///
/// let config = TableConfig::new("docstore://localhost:8081/Foo")
///     .with_collection("FooTable")
///     .with_property("application.name", "docstream");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Connection URI for the document store.
    pub uri: String,
    /// Collection the table is persisted as. Falls back to the table name
    /// when unset.
    pub collection: Option<String>,
    /// Additional store-specific properties.
    pub properties: IndexMap<String, String>,
}

impl TableConfig {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            collection: None,
            properties: IndexMap::new(),
        }
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = Some(collection.to_string());
        self
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Parse a flat `key:value,key:value` property string and merge the
    /// pairs into this configuration.
    pub fn with_property_string(mut self, properties: &str) -> Result<Self, StoreError> {
        for (key, value) in parse_key_value_pairs(properties)? {
            self.properties.insert(key, value);
        }
        Ok(self)
    }

    /// Collection name to use for a table with the given name.
    pub fn collection_for(&self, table_name: &str) -> String {
        match &self.collection {
            Some(collection) if !collection.trim().is_empty() => collection.clone(),
            _ => table_name.to_string(),
        }
    }
}

/// Convert a comma-separated string of `key:value` pairs into a list of
/// trimmed pairs. Empty input yields an empty list; a pair without a colon
/// or with an empty side is a configuration error.
pub fn parse_key_value_pairs(input: &str) -> Result<Vec<(String, String)>, StoreError> {
    let mut pairs = Vec::new();
    if input.trim().is_empty() {
        return Ok(pairs);
    }
    for element in input.split(',') {
        let mut parts = element.splitn(2, ':');
        match (parts.next(), parts.next()) {
            (Some(key), Some(value)) if !key.trim().is_empty() && !value.trim().is_empty() => {
                pairs.push((key.trim().to_string(), value.trim().to_string()));
            }
            _ => {
                return Err(StoreError::ConfigError(format!(
                    "property '{}' must be a key:value pair",
                    element.trim()
                )));
            }
        }
    }
    Ok(pairs)
}
