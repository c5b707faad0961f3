//! In-Memory Stores
//!
//! The only shared mutable state in the library: the per-user credential
//! registry and the registry of in-flight browser authorizations. Both are
//! explicitly owned, injectable objects so tests and multiple independent
//! instances can coexist in one process.

mod accounts;
mod pending;

pub use accounts::AccountStore;
pub use pending::PendingAuthorizationRegistry;
