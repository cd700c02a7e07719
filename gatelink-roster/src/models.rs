use chrono::{DateTime, Utc};
use gatelink_store::{Document, StoreError};
use serde::{Deserialize, Serialize};

pub mod fields {
    pub const NAME: &str = "name";
    pub const SEAT: &str = "seat";
    pub const BOARDED_BY: &str = "boarded_by";
    pub const SOURCE: &str = "source";
    pub const CREATED_AT: &str = "created_at";
}

/// Subcollection path for a session's roster.
pub fn pax_collection(session_id: &str) -> String {
    format!("sessions/{}/pax", session_id)
}

/// How a boarding record came to be. Informational only; both paths funnel
/// through the same append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaxSource {
    Scan,
    Manual,
}

impl PaxSource {
    /// Wire tag as stored in the document.
    pub fn as_str(self) -> &'static str {
        match self {
            PaxSource::Scan => "scan",
            PaxSource::Manual => "manual",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "scan" => Some(PaxSource::Scan),
            "manual" => Some(PaxSource::Manual),
            _ => None,
        }
    }
}

/// One boarded passenger. Created exactly once, never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaxRecord {
    pub id: String,
    pub name: String,
    pub seat: String,
    pub boarded_by: String,
    pub source: PaxSource,
    pub created_at: DateTime<Utc>,
}

impl PaxRecord {
    pub fn from_document(doc: &Document) -> Result<Self, StoreError> {
        let malformed = |what: &str| StoreError::Malformed(doc.id.clone(), what.to_string());

        Ok(Self {
            id: doc.id.clone(),
            name: doc
                .str_field(fields::NAME)
                .ok_or_else(|| malformed("missing name"))?
                .to_string(),
            seat: doc
                .str_field(fields::SEAT)
                .ok_or_else(|| malformed("missing seat"))?
                .to_string(),
            boarded_by: doc
                .str_field(fields::BOARDED_BY)
                .ok_or_else(|| malformed("missing boarded_by"))?
                .to_string(),
            source: doc
                .str_field(fields::SOURCE)
                .and_then(PaxSource::from_tag)
                .ok_or_else(|| malformed("bad source tag"))?,
            created_at: doc
                .timestamp_field(fields::CREATED_AT)
                .ok_or_else(|| malformed("missing created_at"))?,
        })
    }
}
