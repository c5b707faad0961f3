//! Pending Authorization
//!
//! The record held between starting a browser consent flow and the matching
//! redirect callback.

/// One in-flight browser authorization, keyed by its correlation token (the
/// OAuth2 `state` round-tripped through the browser).
#[derive(Clone)]
pub struct PendingAuthorization {
    /// Single-use unguessable token binding the callback to this flow.
    pub correlation_token: String,
    /// The user this flow will credential once the callback arrives.
    pub user_id: String,
    /// Where the host wants the browser sent after completion.
    pub return_address: String,
}

impl std::fmt::Debug for PendingAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAuthorization")
            .field("correlation_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("return_address", &self.return_address)
            .finish()
    }
}
