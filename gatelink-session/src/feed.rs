use gatelink_store::SnapshotFeed;

use crate::models::Session;

/// Typed live view over the caller's sessions.
///
/// Each delivery is the full current result set and replaces the previous
/// one; consumers diff locally if they want incremental updates. Dropping
/// the feed cancels the subscription.
pub struct SessionFeed {
    inner: Box<dyn SnapshotFeed>,
}

impl SessionFeed {
    pub(crate) fn new(inner: Box<dyn SnapshotFeed>) -> Self {
        Self { inner }
    }

    /// Next whole snapshot, or `None` once the store has shut down.
    /// Documents that fail to map are dropped from the snapshot with a
    /// warning rather than poisoning the feed.
    pub async fn next(&mut self) -> Option<Vec<Session>> {
        let docs = self.inner.next().await?;
        let sessions = docs
            .iter()
            .filter_map(|doc| match Session::from_document(doc) {
                Ok(session) => Some(session),
                Err(err) => {
                    tracing::warn!("Skipping malformed session document: {}", err);
                    None
                }
            })
            .collect();
        Some(sessions)
    }
}
