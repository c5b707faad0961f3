//! Error Types
//!
//! Error taxonomy for the token lifecycle manager and its HTTP surfaces.

use std::time::Duration;
use thiserror::Error;

/// Root error type for broker authentication operations.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Refresh token is missing or past its expiry window. Raised before any
    /// network attempt; the user must go through the browser flow again.
    #[error("refresh token missing or expired; user must re-authorize")]
    InvalidRefreshToken,

    /// The user id has never been registered with the account store.
    #[error("unknown user: {user_id}")]
    UnknownUser { user_id: String },

    /// The brokerage token endpoint returned a non-2xx response.
    #[error("token exchange rejected: HTTP {status}: {body}")]
    ExchangeRejected { status: u16, body: String },

    /// A callback arrived with a state value that was never issued or was
    /// already consumed. Treated as a client error (possible replay/CSRF).
    #[error("unknown or already-consumed callback state")]
    UnknownCallbackState,

    /// An authenticated API call came back 401; the bearer token was not
    /// accepted even though it looked valid locally.
    #[error("brokerage API rejected credentials: {body}")]
    Unauthorized { body: String },

    /// An authenticated API call failed with a non-2xx, non-401 status.
    #[error("brokerage API call failed: HTTP {status}: {body}")]
    ApiRejected { status: u16, body: String },

    /// The token endpoint answered 2xx but the body did not decode.
    #[error("malformed token response: {message}")]
    MalformedResponse { message: String },

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AuthError {
    /// True when the only way forward is a new browser authorization.
    pub fn needs_reauthorization(&self) -> bool {
        matches!(self, Self::InvalidRefreshToken)
    }

    /// True for errors caused by the caller rather than the brokerage or the
    /// network; these are expected-business outcomes, not incidents.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRefreshToken | Self::UnknownCallbackState | Self::UnknownUser { .. }
        )
    }
}

/// Network-level failure talking to the brokerage.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("could not read response body: {message}")]
    InvalidBody { message: String },
}

/// Configuration validation failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingRequired { field: &'static str },

    #[error("invalid URL for {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },
}

/// Result type for broker authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Maximum length of a response body carried inside an error.
const MAX_ERROR_BODY_LEN: usize = 2048;

/// Strip characters that would break downstream log lines from a response
/// body before embedding it in an error, and cap its length.
pub fn sanitize_body(body: &str) -> String {
    let mut out = String::with_capacity(body.len().min(MAX_ERROR_BODY_LEN));
    for c in body.chars() {
        if out.len() + c.len_utf8() > MAX_ERROR_BODY_LEN {
            break;
        }
        if c.is_control() {
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}
