use std::collections::HashMap;

use async_trait::async_trait;

use crate::document::{Document, Query, WriteValue};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },
    #[error("Malformed document {0}: {1}")]
    Malformed(String, String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for gatelink_core::CoreError {
    fn from(err: StoreError) -> Self {
        gatelink_core::CoreError::StoreUnavailable(err.to_string())
    }
}

/// Boundary to the document-oriented persistent store.
///
/// Collections are addressed by path, which covers subcollections too
/// ("sessions/{id}/pax"). Updates are atomic at single-document
/// granularity; that atomicity is the only cross-device coordination the
/// core relies on.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document; the store assigns the id and resolves
    /// server-timestamp fields.
    async fn create(
        &self,
        collection: &str,
        fields: HashMap<String, WriteValue>,
    ) -> Result<String, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Atomic partial update. `ArrayUnion` fields get set-union semantics;
    /// `ServerTimestamp` fields are refreshed to store time.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: HashMap<String, WriteValue>,
    ) -> Result<(), StoreError>;

    /// Live subscription: the returned feed yields the full current result
    /// set immediately and again after every qualifying change.
    async fn subscribe(&self, query: Query) -> Result<Box<dyn SnapshotFeed>, StoreError>;
}

/// Cancellable live view over a query.
///
/// Each delivery is a whole snapshot that replaces the previous one, never
/// a diff. Dropping the feed releases the subscription.
#[async_trait]
pub trait SnapshotFeed: Send {
    /// Next snapshot, or `None` once the store has shut down.
    async fn next(&mut self) -> Option<Vec<Document>>;
}
