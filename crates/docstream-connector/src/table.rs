//! Event-table facade over a document store
//!
//! One [`DocumentTable`] per table definition. The facade maps record rows
//! to attribute-named documents, resolves compiled conditions against the
//! current record, and drives the [`DocumentStore`] collaborator.

use crate::condition::{resolve_condition, CompiledCondition};
use crate::config::TableConfig;
use crate::error::StoreError;
use crate::store::{Document, DocumentStore, FxIndexMap};
use docstream_core::Value;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::{debug, info};

/// A streaming-engine table persisted in a document-store collection.
pub struct DocumentTable<S> {
    name: String,
    collection: String,
    attribute_names: Vec<String>,
    store: S,
    connected: bool,
}

impl<S: DocumentStore> DocumentTable<S> {
    pub fn new(name: &str, attribute_names: Vec<String>, config: &TableConfig, store: S) -> Self {
        Self {
            name: name.to_string(),
            collection: config.collection_for(name),
            attribute_names,
            store,
            connected: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Ensure the backing collection exists. Must be called before any
    /// read or write.
    pub async fn connect(&mut self) -> Result<(), StoreError> {
        self.store.ensure_collection(&self.collection).await?;
        self.connected = true;
        info!(
            table = %self.name,
            collection = %self.collection,
            "document table connected"
        );
        Ok(())
    }

    fn check_connected(&self) -> Result<(), StoreError> {
        if self.connected {
            Ok(())
        } else {
            Err(StoreError::NotConnected)
        }
    }

    /// Insert a batch of record rows, one document per record.
    pub async fn insert(&self, records: Vec<Vec<Value>>) -> Result<(), StoreError> {
        self.check_connected()?;
        let documents = records
            .iter()
            .map(|record| self.map_record(record))
            .collect::<Result<Vec<_>, _>>()?;
        self.store.insert(&self.collection, documents).await
    }

    /// Find all documents matching the condition resolved against the
    /// current record's attribute values.
    pub async fn find(
        &self,
        condition: &CompiledCondition,
        values: &FxHashMap<String, Value>,
    ) -> Result<Vec<Document>, StoreError> {
        self.check_connected()?;
        let filter = resolve_condition(condition, values);
        self.store.find(&self.collection, &filter).await
    }

    /// True if at least one document matches.
    pub async fn contains(
        &self,
        condition: &CompiledCondition,
        values: &FxHashMap<String, Value>,
    ) -> Result<bool, StoreError> {
        Ok(!self.find(condition, values).await?.is_empty())
    }

    /// Update all matching documents with the given set of attribute
    /// values. Returns the number of documents updated.
    pub async fn update(
        &self,
        condition: &CompiledCondition,
        values: &FxHashMap<String, Value>,
        set: Document,
    ) -> Result<u64, StoreError> {
        self.check_connected()?;
        let filter = resolve_condition(condition, values);
        self.store.update(&self.collection, &filter, set).await
    }

    /// Delete all matching documents. Returns the number deleted.
    pub async fn delete(
        &self,
        condition: &CompiledCondition,
        values: &FxHashMap<String, Value>,
    ) -> Result<u64, StoreError> {
        self.check_connected()?;
        let filter = resolve_condition(condition, values);
        self.store.delete(&self.collection, &filter).await
    }

    /// Close the underlying store client.
    pub async fn close(&self) -> Result<(), StoreError> {
        self.store.close().await
    }

    fn map_record(&self, record: &[Value]) -> Result<Document, StoreError> {
        if record.len() != self.attribute_names.len() {
            return Err(StoreError::WriteFailed(format!(
                "record carries {} values but table '{}' defines {} attributes",
                record.len(),
                self.name,
                self.attribute_names.len()
            )));
        }
        let document = map_values_to_attributes(record, &self.attribute_names);
        debug!(table = %self.name, ?document, "record mapped to document");
        Ok(document)
    }
}

/// Pair record values with their attribute names, in attribute order.
pub fn map_values_to_attributes(record: &[Value], attribute_names: &[String]) -> Document {
    let mut document = FxIndexMap::with_capacity_and_hasher(record.len(), FxBuildHasher);
    for (name, value) in attribute_names.iter().zip(record) {
        document.insert(name.clone(), value.clone());
    }
    document
}
