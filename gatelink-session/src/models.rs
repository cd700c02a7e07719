use chrono::{DateTime, Utc};
use gatelink_core::FlightCode;
use gatelink_store::{Document, StoreError};
use serde::{Deserialize, Serialize};

/// Top-level collection holding session documents.
pub const SESSIONS: &str = "sessions";

pub mod fields {
    pub const FLIGHT_CODE: &str = "flight_code";
    pub const OWNER_UID: &str = "owner_uid";
    pub const MEMBERS: &str = "members";
    pub const ACTIVE: &str = "active";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
}

/// A shared boarding context bound to one flight code.
///
/// `members` only ever grows, through atomic set-union on the stored
/// document; there is no leave operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub flight_code: FlightCode,
    pub owner_uid: String,
    pub members: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn from_document(doc: &Document) -> Result<Self, StoreError> {
        let malformed = |what: &str| StoreError::Malformed(doc.id.clone(), what.to_string());

        let flight_code = doc
            .str_field(fields::FLIGHT_CODE)
            .ok_or_else(|| malformed("missing flight_code"))?;
        Ok(Self {
            id: doc.id.clone(),
            flight_code: FlightCode::parse(flight_code)
                .map_err(|_| malformed("empty flight_code"))?,
            owner_uid: doc
                .str_field(fields::OWNER_UID)
                .ok_or_else(|| malformed("missing owner_uid"))?
                .to_string(),
            members: doc
                .string_array_field(fields::MEMBERS)
                .ok_or_else(|| malformed("missing members"))?,
            active: doc
                .bool_field(fields::ACTIVE)
                .ok_or_else(|| malformed("missing active"))?,
            created_at: doc
                .timestamp_field(fields::CREATED_AT)
                .ok_or_else(|| malformed("missing created_at"))?,
            updated_at: doc
                .timestamp_field(fields::UPDATED_AT)
                .ok_or_else(|| malformed("missing updated_at"))?,
        })
    }
}

/// What create/join hand back: enough to gate scans and append to the
/// roster without re-reading the session document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub session_id: String,
    pub flight_code: FlightCode,
}
