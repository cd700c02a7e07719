pub mod context;
pub mod flight_code;
pub mod identity;
pub mod verify;

pub use context::SessionContext;
pub use flight_code::FlightCode;
pub use identity::{derive_login_id, IdentityProvider, MockIdentityProvider};
pub use verify::{verify, ScanOutcome};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid flight code: nothing left after normalization")]
    InvalidCode,
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("No active session for flight code {0}")]
    NoActiveSession(String),
    #[error("Authentication required")]
    AuthRequired,
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
