use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::document::{Direction, Document, Fields, Query, WriteValue};
use crate::store::{DocumentStore, SnapshotFeed, StoreError};

const DEFAULT_CHANGE_CAPACITY: usize = 64;

struct StoredDoc {
    /// Creation order, used as tiebreaker when two documents carry the
    /// same server timestamp.
    seq: u64,
    fields: Fields,
}

struct Inner {
    collections: RwLock<HashMap<String, HashMap<String, StoredDoc>>>,
    changes: broadcast::Sender<String>,
    seq: AtomicU64,
}

/// In-memory `DocumentStore` backing tests and local single-process runs.
///
/// Every mutation happens under one write lock, which gives the same
/// per-document atomicity the real store promises; subscribers are fanned
/// out to over a broadcast channel carrying the changed collection path.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANGE_CAPACITY)
    }

    /// `capacity` bounds the change-signal buffer; a subscriber that falls
    /// further behind collapses the missed signals into one fresh snapshot.
    pub fn with_capacity(capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(HashMap::new()),
                changes,
                seq: AtomicU64::new(0),
            }),
        }
    }

    fn notify(&self, collection: &str) {
        // No receivers is fine; feeds come and go.
        let _ = self.inner.changes.send(collection.to_string());
    }

    fn apply_writes(fields: &mut Fields, writes: HashMap<String, WriteValue>, now_millis: i64) {
        for (name, write) in writes {
            match write {
                WriteValue::Value(value) => {
                    fields.insert(name, value);
                }
                WriteValue::ServerTimestamp => {
                    fields.insert(name, json!(now_millis));
                }
                WriteValue::ArrayUnion(values) => {
                    let slot = fields.entry(name).or_insert_with(|| Value::Array(Vec::new()));
                    if !slot.is_array() {
                        *slot = Value::Array(Vec::new());
                    }
                    if let Value::Array(items) = slot {
                        for value in values {
                            if !items.contains(&value) {
                                items.push(value);
                            }
                        }
                    }
                }
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn value_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .total_cmp(&y.as_f64().unwrap_or(0.0)),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(
        &self,
        collection: &str,
        fields: HashMap<String, WriteValue>,
    ) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let now_millis = Utc::now().timestamp_millis();
        let seq = self.inner.seq.fetch_add(1, AtomicOrdering::SeqCst);

        let mut resolved = Fields::new();
        Self::apply_writes(&mut resolved, fields, now_millis);

        let mut collections = self.inner.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(
                id.clone(),
                StoredDoc {
                    seq,
                    fields: resolved,
                },
            );
        drop(collections);

        tracing::debug!("Created {}/{}", collection, id);
        self.notify(collection);
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|table| table.get(id))
            .map(|stored| Document {
                id: id.to_string(),
                fields: stored.fields.clone(),
            }))
    }

    async fn find(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.inner.collections.read().await;
        let Some(table) = collections.get(&query.collection) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<(&String, &StoredDoc)> = table
            .iter()
            .filter(|(_, stored)| query.matches_fields(&stored.fields))
            .collect();

        if let Some(order) = &query.order_by {
            rows.sort_by(|(_, a), (_, b)| {
                let ordering = value_cmp(a.fields.get(&order.field), b.fields.get(&order.field))
                    .then(a.seq.cmp(&b.seq));
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        } else {
            // Stable default: creation order.
            rows.sort_by_key(|(_, stored)| stored.seq);
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows
            .into_iter()
            .map(|(id, stored)| Document {
                id: id.clone(),
                fields: stored.fields.clone(),
            })
            .collect())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: HashMap<String, WriteValue>,
    ) -> Result<(), StoreError> {
        let now_millis = Utc::now().timestamp_millis();

        let mut collections = self.inner.collections.write().await;
        let stored = collections
            .get_mut(collection)
            .and_then(|table| table.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        Self::apply_writes(&mut stored.fields, fields, now_millis);
        drop(collections);

        self.notify(collection);
        Ok(())
    }

    async fn subscribe(&self, query: Query) -> Result<Box<dyn SnapshotFeed>, StoreError> {
        Ok(Box::new(MemoryFeed {
            store: self.clone(),
            rx: self.inner.changes.subscribe(),
            query,
            primed: false,
        }))
    }
}

struct MemoryFeed {
    store: MemoryStore,
    rx: broadcast::Receiver<String>,
    query: Query,
    primed: bool,
}

impl MemoryFeed {
    async fn snapshot(&self) -> Option<Vec<Document>> {
        self.store.find(&self.query).await.ok()
    }
}

#[async_trait]
impl SnapshotFeed for MemoryFeed {
    async fn next(&mut self) -> Option<Vec<Document>> {
        if !self.primed {
            self.primed = true;
            return self.snapshot().await;
        }

        loop {
            match self.rx.recv().await {
                Ok(collection) if collection == self.query.collection => {
                    return self.snapshot().await;
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(
                        "Snapshot feed lagged by {} changes; delivering a fresh snapshot",
                        missed
                    );
                    return self.snapshot().await;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
