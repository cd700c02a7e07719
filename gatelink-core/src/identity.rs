use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use uuid::Uuid;

/// Fixed suffix appended to every derived login id.
const LOGIN_SUFFIX: &str = "@gatelink.app";

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Handle already registered: {0}")]
    HandleTaken(String),
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Boundary to the external identity provider.
///
/// The provider hands back a stable opaque user id; the core never inspects
/// it beyond equality. Auth-state transitions are observable through a
/// watch channel so a client can rebuild its session context on sign-in
/// and tear it down on sign-out.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, login_id: &str, secret: &str) -> Result<String, IdentityError>;

    async fn sign_in(&self, login_id: &str, secret: &str) -> Result<String, IdentityError>;

    fn current_user_id(&self) -> Option<String>;

    async fn sign_out(&self);

    /// Delivers the current user id (or `None`) on every auth transition.
    fn watch_auth_state(&self) -> watch::Receiver<Option<String>>;
}

/// One-way mapping from a user-chosen handle to a provider-compatible
/// login id: lowercase, unsafe characters replaced, synthetic suffix
/// appended. The derived string is opaque — nothing in the core treats it
/// as meaningful data.
pub fn derive_login_id(handle: &str) -> String {
    let safe: String = handle
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '.' })
        .collect();
    format!("{}{}", safe, LOGIN_SUFFIX)
}

struct MockUser {
    uid: String,
    secret: String,
}

/// In-memory identity provider for tests and local development.
pub struct MockIdentityProvider {
    users: RwLock<HashMap<String, MockUser>>,
    auth_tx: watch::Sender<Option<String>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        let (auth_tx, _) = watch::channel(None);
        Self {
            users: RwLock::new(HashMap::new()),
            auth_tx,
        }
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_up(&self, login_id: &str, secret: &str) -> Result<String, IdentityError> {
        let mut users = self.users.write().await;
        if users.contains_key(login_id) {
            return Err(IdentityError::HandleTaken(login_id.to_string()));
        }
        let uid = Uuid::new_v4().to_string();
        users.insert(
            login_id.to_string(),
            MockUser {
                uid: uid.clone(),
                secret: secret.to_string(),
            },
        );
        tracing::info!("Registered user {} as {}", login_id, uid);
        // send_replace stores the state even when nobody is watching yet;
        // plain send would drop it without a live receiver.
        self.auth_tx.send_replace(Some(uid.clone()));
        Ok(uid)
    }

    async fn sign_in(&self, login_id: &str, secret: &str) -> Result<String, IdentityError> {
        let users = self.users.read().await;
        let user = users
            .get(login_id)
            .filter(|u| u.secret == secret)
            .ok_or(IdentityError::InvalidCredentials)?;
        self.auth_tx.send_replace(Some(user.uid.clone()));
        Ok(user.uid.clone())
    }

    fn current_user_id(&self) -> Option<String> {
        self.auth_tx.borrow().clone()
    }

    async fn sign_out(&self) {
        self.auth_tx.send_replace(None);
    }

    fn watch_auth_state(&self) -> watch::Receiver<Option<String>> {
        self.auth_tx.subscribe()
    }
}
