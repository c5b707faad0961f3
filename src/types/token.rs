//! Token Wire Types
//!
//! The brokerage token endpoint response, decoded tolerantly: unknown fields
//! are kept aside and `expires_in` accepts the numeric-string form some
//! gateways emit.

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Token endpoint response for both grant types.
///
/// `refresh_token` is present only for the authorization-code grant; the
/// refresh grant leaves the existing refresh token and its expiry untouched.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Accept `1800`, `"1800"`, or absence for a seconds field.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_u64()),
        Some(serde_json::Value::String(s)) => Ok(s.trim().parse().ok()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected seconds, got {other}"
        ))),
    }
}
