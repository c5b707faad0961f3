//! Configuration Types
//!
//! Immutable configuration for the brokerage OAuth2 integration. Built once
//! via [`crate::builders::broker_config`] and passed by value to every
//! component at construction time.

use chrono::Duration as ChronoDuration;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Brokerage OAuth2 configuration.
///
/// Every external parameter of the protocol lives here: endpoints, the static
/// client credential pair, the redirect URI registered with the brokerage,
/// and the timing policy constants.
#[derive(Clone)]
pub struct BrokerConfig {
    /// Consent page the browser is redirected to.
    pub authorize_endpoint: Url,
    /// Token endpoint for both grant exchanges.
    pub token_endpoint: Url,
    /// Static client identifier.
    pub client_id: String,
    /// Static client secret, sent via HTTP Basic auth.
    pub client_secret: SecretString,
    /// Redirect URI registered with the brokerage (our callback endpoint).
    pub redirect_uri: String,
    /// Scope requested on the consent page, if any.
    pub scope: Option<String>,
    /// Bound on each network call to the brokerage.
    pub timeout: Duration,
    /// Safety margin applied to both access and refresh expiry checks so a
    /// credential is never used when it could expire mid-call.
    pub expiry_skew: ChronoDuration,
    /// Lifetime assigned to a refresh token at authorization time. The
    /// brokerage does not report this value; it is an external policy
    /// constant (observed: 7 days).
    pub refresh_token_lifetime: ChronoDuration,
}

impl std::fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("authorize_endpoint", &self.authorize_endpoint.as_str())
            .field("token_endpoint", &self.token_endpoint.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .field("timeout", &self.timeout)
            .field("expiry_skew", &self.expiry_skew)
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .finish()
    }
}

/// Default network timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default expiry safety margin in seconds.
pub const DEFAULT_EXPIRY_SKEW_SECS: i64 = 60;
/// Default refresh token lifetime in days.
pub const DEFAULT_REFRESH_LIFETIME_DAYS: i64 = 7;
