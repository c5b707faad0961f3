//! Configuration Builder
//!
//! Fluent builder for [`BrokerConfig`] with validation of required fields
//! and endpoint URLs at build time.

use chrono::Duration as ChronoDuration;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::types::config::{
    DEFAULT_EXPIRY_SKEW_SECS, DEFAULT_REFRESH_LIFETIME_DAYS, DEFAULT_TIMEOUT_SECS,
};
use crate::types::BrokerConfig;

/// Create a new configuration builder.
pub fn broker_config() -> BrokerConfigBuilder {
    BrokerConfigBuilder::new()
}

/// Builder for [`BrokerConfig`].
pub struct BrokerConfigBuilder {
    authorize_endpoint: Option<String>,
    token_endpoint: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    redirect_uri: Option<String>,
    scope: Option<String>,
    timeout: Duration,
    expiry_skew: ChronoDuration,
    refresh_token_lifetime: ChronoDuration,
}

impl Default for BrokerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BrokerConfigBuilder {
    pub fn new() -> Self {
        Self {
            authorize_endpoint: None,
            token_endpoint: None,
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            scope: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            expiry_skew: ChronoDuration::seconds(DEFAULT_EXPIRY_SKEW_SECS),
            refresh_token_lifetime: ChronoDuration::days(DEFAULT_REFRESH_LIFETIME_DAYS),
        }
    }

    pub fn authorize_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.authorize_endpoint = Some(endpoint.into());
        self
    }

    pub fn token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(endpoint.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Safety margin applied to expiry checks.
    pub fn expiry_skew_secs(mut self, secs: i64) -> Self {
        self.expiry_skew = ChronoDuration::seconds(secs);
        self
    }

    /// Policy lifetime assigned to refresh tokens at authorization time.
    pub fn refresh_token_lifetime_days(mut self, days: i64) -> Self {
        self.refresh_token_lifetime = ChronoDuration::days(days);
        self
    }

    pub fn build(self) -> Result<BrokerConfig, ConfigError> {
        let authorize_endpoint = parse_endpoint("authorize_endpoint", self.authorize_endpoint)?;
        let token_endpoint = parse_endpoint("token_endpoint", self.token_endpoint)?;
        let client_id = self
            .client_id
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingRequired { field: "client_id" })?;
        let client_secret = self.client_secret.ok_or(ConfigError::MissingRequired {
            field: "client_secret",
        })?;
        let redirect_uri = self.redirect_uri.ok_or(ConfigError::MissingRequired {
            field: "redirect_uri",
        })?;
        Url::parse(&redirect_uri).map_err(|_| ConfigError::InvalidUrl {
            field: "redirect_uri",
            url: redirect_uri.clone(),
        })?;

        Ok(BrokerConfig {
            authorize_endpoint,
            token_endpoint,
            client_id,
            client_secret,
            redirect_uri,
            scope: self.scope,
            timeout: self.timeout,
            expiry_skew: self.expiry_skew,
            refresh_token_lifetime: self.refresh_token_lifetime,
        })
    }
}

fn parse_endpoint(field: &'static str, value: Option<String>) -> Result<Url, ConfigError> {
    let value = value.ok_or(ConfigError::MissingRequired { field })?;
    Url::parse(&value).map_err(|_| ConfigError::InvalidUrl { field, url: value })
}
