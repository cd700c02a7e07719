use std::collections::HashMap;
use std::sync::Arc;

use gatelink_core::{CoreError, CoreResult, FlightCode, SessionContext};
use gatelink_store::app_config::FeedConfig;
use gatelink_store::{DocumentStore, Query, WriteValue};
use serde_json::json;

use crate::feed::SessionFeed;
use crate::models::{fields, SessionHandle, SESSIONS};

/// Create-or-join resolution over the `sessions` collection.
pub struct SessionDirectory {
    store: Arc<dyn DocumentStore>,
    session_window: usize,
}

impl SessionDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, &FeedConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStore>, feeds: &FeedConfig) -> Self {
        Self {
            store,
            session_window: feeds.session_window,
        }
    }

    /// Create a fresh session for a flight, owned by the caller.
    ///
    /// Deliberately no uniqueness check against existing sessions: two
    /// devices creating for the same flight at once each get their own
    /// session, and joiners resolve to the newest active one. Enforcing a
    /// single session per code would need a compare-and-swap on a
    /// code-index document and is traded away for availability.
    pub async fn create_session(
        &self,
        ctx: &SessionContext,
        raw_code: &str,
    ) -> CoreResult<SessionHandle> {
        let code = FlightCode::parse(raw_code)?;

        let mut writes = HashMap::new();
        writes.insert(
            fields::FLIGHT_CODE.to_string(),
            WriteValue::Value(json!(code.as_str())),
        );
        writes.insert(
            fields::OWNER_UID.to_string(),
            WriteValue::Value(json!(ctx.uid())),
        );
        writes.insert(
            fields::MEMBERS.to_string(),
            WriteValue::Value(json!([ctx.uid()])),
        );
        writes.insert(fields::ACTIVE.to_string(), WriteValue::Value(json!(true)));
        writes.insert(fields::CREATED_AT.to_string(), WriteValue::ServerTimestamp);
        writes.insert(fields::UPDATED_AT.to_string(), WriteValue::ServerTimestamp);

        let session_id = self.store.create(SESSIONS, writes).await?;
        tracing::info!("Session {} created for flight {}", session_id, code);

        Ok(SessionHandle {
            session_id,
            flight_code: code,
        })
    }

    /// Join the most recently created active session for a flight.
    ///
    /// Membership is added via atomic set-union, so concurrent joiners
    /// never lose each other's writes and re-joining is a no-op.
    pub async fn join_session(
        &self,
        ctx: &SessionContext,
        raw_code: &str,
    ) -> CoreResult<SessionHandle> {
        let code = FlightCode::parse(raw_code)?;

        let query = Query::collection(SESSIONS)
            .filter_eq(fields::FLIGHT_CODE, json!(code.as_str()))
            .filter_eq(fields::ACTIVE, json!(true))
            .order_by_desc(fields::CREATED_AT)
            .limit(1);
        let candidate = self
            .store
            .find(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::NoActiveSession(code.as_str().to_string()))?;

        let mut writes = HashMap::new();
        writes.insert(
            fields::MEMBERS.to_string(),
            WriteValue::ArrayUnion(vec![json!(ctx.uid())]),
        );
        writes.insert(fields::UPDATED_AT.to_string(), WriteValue::ServerTimestamp);
        self.store.update(SESSIONS, &candidate.id, writes).await?;

        tracing::info!("User {} joined session {} ({})", ctx.uid(), candidate.id, code);
        Ok(SessionHandle {
            session_id: candidate.id,
            flight_code: code,
        })
    }

    /// Live feed of the caller's active sessions, newest first, capped at
    /// the configured window. Used to resume a session after restart.
    pub async fn my_sessions(&self, ctx: &SessionContext) -> CoreResult<SessionFeed> {
        let query = Query::collection(SESSIONS)
            .filter_eq(fields::ACTIVE, json!(true))
            .array_contains(fields::MEMBERS, json!(ctx.uid()))
            .order_by_desc(fields::CREATED_AT)
            .limit(self.session_window);
        let feed = self.store.subscribe(query).await?;
        Ok(SessionFeed::new(feed))
    }
}
