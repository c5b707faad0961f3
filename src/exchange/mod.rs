//! Token Exchange Client
//!
//! The two brokerage token-endpoint exchanges, form-encoded and
//! authenticated with the static client id/secret pair as an HTTP Basic
//! credential. No retry policy lives here; failures propagate to the caller.

use base64::Engine;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::sync::Arc;
use url::form_urlencoded;

use crate::core::{HttpRequest, HttpTransport};
use crate::error::{sanitize_body, AuthError, AuthResult};
use crate::types::{BrokerConfig, TokenResponse};

/// Client for the brokerage token endpoint.
pub struct TokenExchangeClient<T: HttpTransport> {
    config: BrokerConfig,
    transport: Arc<T>,
}

impl<T: HttpTransport> TokenExchangeClient<T> {
    pub fn new(config: BrokerConfig, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    /// Exchange a one-time authorization code for a full token set. Used at
    /// the end of the browser consent flow; the response carries both an
    /// access token and a refresh token.
    pub async fn exchange_authorization_code(&self, code: &str) -> AuthResult<TokenResponse> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "authorization_code")
            .append_pair("access_type", "offline")
            .append_pair("code", code)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .finish();

        self.post_token_request(body).await
    }

    /// Exchange a refresh token for a fresh access token. The brokerage does
    /// not return a new refresh token from this grant; the existing one keeps
    /// its original expiry.
    pub async fn exchange_refresh_token(&self, refresh_token: &str) -> AuthResult<TokenResponse> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", refresh_token)
            .finish();

        self.post_token_request(body).await
    }

    async fn post_token_request(&self, body: String) -> AuthResult<TokenResponse> {
        let request = HttpRequest {
            method: crate::core::HttpMethod::Post,
            url: self.config.token_endpoint.to_string(),
            headers: self.token_request_headers(),
            body: Some(body),
            timeout: Some(self.config.timeout),
        };

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(AuthError::ExchangeRejected {
                status: response.status,
                body: sanitize_body(&response.body),
            });
        }

        serde_json::from_str(&response.body).map_err(|e| AuthError::MalformedResponse {
            message: e.to_string(),
        })
    }

    fn token_request_headers(&self) -> HashMap<String, String> {
        let credentials = format!(
            "{}:{}",
            self.config.client_id,
            self.config.client_secret.expose_secret()
        );
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);

        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("accept".to_string(), "application/json".to_string());
        headers.insert("authorization".to_string(), format!("Basic {}", encoded));
        headers
    }
}
