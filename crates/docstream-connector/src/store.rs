//! Document-store collaborator contract

use crate::error::StoreError;
use async_trait::async_trait;
use docstream_core::Value;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// IndexMap keyed with FxBuildHasher for faster attribute lookups.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A single document: attribute name to scalar value, in attribute order.
pub type Document = FxIndexMap<String, Value>;

/// Contract between the table facade and an actual document-store client.
///
/// Filters arrive as fully resolved literal strings produced by the
/// condition compiler and resolver; this trait treats them as opaque
/// payload. Implementations own all connection handling.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create the collection if it does not exist yet.
    async fn ensure_collection(&self, collection: &str) -> Result<(), StoreError>;

    /// Insert a batch of documents.
    async fn insert(&self, collection: &str, documents: Vec<Document>) -> Result<(), StoreError>;

    /// Fetch all documents matching the filter.
    async fn find(&self, collection: &str, filter: &str) -> Result<Vec<Document>, StoreError>;

    /// Set the given attributes on every document matching the filter.
    /// Returns the number of documents updated.
    async fn update(
        &self,
        collection: &str,
        filter: &str,
        set: Document,
    ) -> Result<u64, StoreError>;

    /// Delete every document matching the filter. Returns the number of
    /// documents deleted.
    async fn delete(&self, collection: &str, filter: &str) -> Result<u64, StoreError>;

    /// Close the underlying client and release resources.
    async fn close(&self) -> Result<(), StoreError>;
}
