//! Credential Record
//!
//! Per-user credential state: the long-lived refresh token and the cached
//! short-lived access token, each with its expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One end user's credentials.
///
/// Invariant: `access_token` and `access_expires_at` are set and cleared
/// together. The access fields are rewritten by every successful refresh;
/// the refresh fields only by a completed authorization-code exchange (the
/// brokerage does not rotate refresh tokens).
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Opaque unique user identifier.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_expires_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Create an empty record for a user known to the host but not yet
    /// authorized.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            refresh_token: None,
            refresh_expires_at: None,
            access_token: None,
            access_expires_at: None,
        }
    }

    /// True when the refresh token exists and stays valid past the skew
    /// window. Only then can a new access token be minted without a fresh
    /// browser authorization.
    pub fn is_refresh_valid(&self, skew: Duration, now: DateTime<Utc>) -> bool {
        match (&self.refresh_token, self.refresh_expires_at) {
            (Some(_), Some(expires_at)) => now + skew < expires_at,
            _ => false,
        }
    }

    /// True when the cached access token stays valid past the skew window.
    pub fn is_access_valid(&self, skew: Duration, now: DateTime<Utc>) -> bool {
        match (&self.access_token, self.access_expires_at) {
            (Some(_), Some(expires_at)) => now + skew < expires_at,
            _ => false,
        }
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user_id", &self.user_id)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_expires_at", &self.refresh_expires_at)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("access_expires_at", &self.access_expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skew() -> Duration {
        Duration::seconds(60)
    }

    #[test]
    fn test_empty_record_is_invalid() {
        let record = CredentialRecord::new("u1");
        let now = Utc::now();
        assert!(!record.is_refresh_valid(skew(), now));
        assert!(!record.is_access_valid(skew(), now));
    }

    #[test]
    fn test_access_valid_outside_skew() {
        let now = Utc::now();
        let mut record = CredentialRecord::new("u1");
        record.access_token = Some("A".to_string());
        record.access_expires_at = Some(now + Duration::seconds(1800));
        assert!(record.is_access_valid(skew(), now));
    }

    #[test]
    fn test_access_invalid_within_skew() {
        let now = Utc::now();
        let mut record = CredentialRecord::new("u1");
        record.access_token = Some("A".to_string());
        // Expires in 30 seconds, inside the 60 second margin.
        record.access_expires_at = Some(now + Duration::seconds(30));
        assert!(!record.is_access_valid(skew(), now));
    }

    #[test]
    fn test_refresh_invalid_when_past_expiry() {
        let now = Utc::now();
        let mut record = CredentialRecord::new("u1");
        record.refresh_token = Some("R".to_string());
        record.refresh_expires_at = Some(now - Duration::seconds(1));
        assert!(!record.is_refresh_valid(skew(), now));
    }

    #[test]
    fn test_refresh_valid_outside_skew() {
        let now = Utc::now();
        let mut record = CredentialRecord::new("u1");
        record.refresh_token = Some("R".to_string());
        record.refresh_expires_at = Some(now + Duration::days(7));
        assert!(record.is_refresh_valid(skew(), now));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let mut record = CredentialRecord::new("u1");
        record.refresh_token = Some("R-secret".to_string());
        record.access_token = Some("A-secret".to_string());
        let debug = format!("{:?}", record);
        assert!(debug.contains("u1"));
        assert!(!debug.contains("R-secret"));
        assert!(!debug.contains("A-secret"));
    }
}
