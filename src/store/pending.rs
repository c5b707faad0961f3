//! Pending Authorization Registry
//!
//! Maps a one-time correlation token to the user and return address of an
//! in-flight browser consent flow. A token is consumed at most once; a
//! replayed callback finds nothing and fails.
//!
//! Entries for abandoned flows stay in memory; the host may layer its own
//! expiry on top if that leak matters to it.

use base64::Engine;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::PendingAuthorization;

/// In-memory single-use token store for the redirect flow.
#[derive(Default)]
pub struct PendingAuthorizationRegistry {
    pending: Mutex<HashMap<String, PendingAuthorization>>,
}

impl PendingAuthorizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a flow: generates a fresh unguessable correlation
    /// token, stores the mapping, and returns the token for use as the
    /// OAuth2 `state` parameter.
    pub fn create(&self, user_id: impl Into<String>, return_address: impl Into<String>) -> String {
        let correlation_token = Self::generate_correlation_token();
        let entry = PendingAuthorization {
            correlation_token: correlation_token.clone(),
            user_id: user_id.into(),
            return_address: return_address.into(),
        };
        self.pending
            .lock()
            .unwrap()
            .insert(correlation_token.clone(), entry);
        correlation_token
    }

    /// Atomic lookup-and-delete. Returns `None` for a token that was never
    /// issued or was already consumed.
    pub fn consume(&self, correlation_token: &str) -> Option<PendingAuthorization> {
        self.pending.lock().unwrap().remove(correlation_token)
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }

    fn generate_correlation_token() -> String {
        let bytes: [u8; 32] = rand::thread_rng().gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_returns_distinct_tokens() {
        let registry = PendingAuthorizationRegistry::new();
        let t1 = registry.create("u1", "https://host/done");
        let t2 = registry.create("u1", "https://host/done");
        assert_ne!(t1, t2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_consume_returns_stored_entry() {
        let registry = PendingAuthorizationRegistry::new();
        let token = registry.create("u1", "https://host/done");

        let entry = registry.consume(&token).unwrap();
        assert_eq!(entry.user_id, "u1");
        assert_eq!(entry.return_address, "https://host/done");
        assert_eq!(entry.correlation_token, token);
    }

    #[test]
    fn test_consume_is_single_use() {
        let registry = PendingAuthorizationRegistry::new();
        let token = registry.create("u1", "https://host/done");

        assert!(registry.consume(&token).is_some());
        assert!(registry.consume(&token).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_consume_unknown_token_is_none() {
        let registry = PendingAuthorizationRegistry::new();
        assert!(registry.consume("forged").is_none());
    }
}
