//! Data Types
//!
//! Configuration, credential, and wire types.

mod account;
mod callback;
pub(crate) mod config;
mod token;

pub use account::CredentialRecord;
pub use callback::PendingAuthorization;
pub use config::BrokerConfig;
pub use token::TokenResponse;
