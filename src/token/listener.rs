//! Token Change Listener
//!
//! Host-supplied persistence hooks. Tokens live only in process memory;
//! a host that wants durability across restarts persists records from these
//! callbacks and replays them through registration at startup.

use async_trait::async_trait;

use crate::types::CredentialRecord;

/// Error type for listener callbacks. Listener failures are logged by the
/// caller and never propagate into the refresh or authorization result.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Observer for credential mutations.
#[async_trait]
pub trait TokenChangeListener: Send + Sync {
    /// A successful refresh rewrote the access token and its expiry.
    async fn on_access_token_change(&self, record: &CredentialRecord) -> Result<(), ListenerError>;

    /// A completed authorization-code exchange installed a new refresh token
    /// (and access token) for the user.
    async fn on_refresh_token_change(&self, record: &CredentialRecord) -> Result<(), ListenerError>;
}

/// Listener that ignores all notifications.
#[derive(Default)]
pub struct NoopListener;

#[async_trait]
impl TokenChangeListener for NoopListener {
    async fn on_access_token_change(&self, _record: &CredentialRecord) -> Result<(), ListenerError> {
        Ok(())
    }

    async fn on_refresh_token_change(
        &self,
        _record: &CredentialRecord,
    ) -> Result<(), ListenerError> {
        Ok(())
    }
}
