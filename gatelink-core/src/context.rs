use crate::identity::IdentityProvider;
use crate::{CoreError, CoreResult};

/// Explicit per-sign-in context handed to the directory and ledger.
///
/// Built once when a user signs in and dropped on sign-out; operations take
/// it as an argument instead of looking auth state up ambiently, so the
/// construction and teardown boundary is visible in the call graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    uid: String,
}

impl SessionContext {
    /// Capture the currently signed-in user.
    ///
    /// Fails with `AuthRequired` when nobody is signed in.
    pub fn current(provider: &dyn IdentityProvider) -> CoreResult<Self> {
        let uid = provider.current_user_id().ok_or(CoreError::AuthRequired)?;
        Ok(Self { uid })
    }

    /// Build a context for a known uid (e.g. restored from a feed event).
    pub fn for_uid(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
}
