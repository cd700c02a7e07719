use std::collections::HashMap;
use std::sync::Arc;

use gatelink_core::{CoreError, CoreResult, SessionContext};
use gatelink_store::app_config::FeedConfig;
use gatelink_store::{DocumentStore, Query, SnapshotFeed, WriteValue};
use serde_json::json;

use crate::models::{fields, pax_collection, PaxRecord, PaxSource};

/// Append-only boarding log for a session, with a live bounded view.
pub struct RosterLedger {
    store: Arc<dyn DocumentStore>,
    roster_window: usize,
}

impl RosterLedger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, &FeedConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStore>, feeds: &FeedConfig) -> Self {
        Self {
            store,
            roster_window: feeds.roster_window,
        }
    }

    /// Record a boarded passenger.
    ///
    /// Pure append: no dedup and no seat-conflict check. The seat is
    /// uppercased so the stored roster is uniform.
    pub async fn append_pax(
        &self,
        ctx: &SessionContext,
        session_id: &str,
        name: &str,
        seat: &str,
        source: PaxSource,
    ) -> CoreResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError(
                "passenger name must not be empty".to_string(),
            ));
        }
        let seat = seat.trim().to_uppercase();
        if seat.is_empty() {
            return Err(CoreError::ValidationError(
                "seat must not be empty".to_string(),
            ));
        }

        let mut writes = HashMap::new();
        writes.insert(fields::NAME.to_string(), WriteValue::Value(json!(name)));
        writes.insert(fields::SEAT.to_string(), WriteValue::Value(json!(seat)));
        writes.insert(
            fields::BOARDED_BY.to_string(),
            WriteValue::Value(json!(ctx.uid())),
        );
        writes.insert(
            fields::SOURCE.to_string(),
            WriteValue::Value(json!(source.as_str())),
        );
        writes.insert(fields::CREATED_AT.to_string(), WriteValue::ServerTimestamp);

        let record_id = self.store.create(&pax_collection(session_id), writes).await?;
        tracing::info!(
            "Pax {} ({}) boarded on session {} by {}",
            name,
            seat,
            session_id,
            ctx.uid()
        );
        Ok(record_id)
    }

    /// Live view of the session's roster, most recent first, capped at the
    /// configured window.
    pub async fn watch_roster(&self, session_id: &str) -> CoreResult<RosterFeed> {
        let query = Query::collection(pax_collection(session_id))
            .order_by_desc(fields::CREATED_AT)
            .limit(self.roster_window);
        let feed = self.store.subscribe(query).await?;
        Ok(RosterFeed { inner: feed })
    }
}

/// Typed live view over a session's roster; whole-snapshot semantics, drop
/// to cancel.
pub struct RosterFeed {
    inner: Box<dyn SnapshotFeed>,
}

impl RosterFeed {
    pub async fn next(&mut self) -> Option<Vec<PaxRecord>> {
        let docs = self.inner.next().await?;
        let records = docs
            .iter()
            .filter_map(|doc| match PaxRecord::from_document(doc) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!("Skipping malformed pax document: {}", err);
                    None
                }
            })
            .collect();
        Some(records)
    }
}
