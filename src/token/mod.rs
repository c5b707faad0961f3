//! Token Lifecycle
//!
//! The core state machine: refresh-token validation, lazy access-token
//! renewal, and authorization completion, plus the host-facing token change
//! listener seam.

mod listener;
mod manager;

pub use listener::{ListenerError, NoopListener, TokenChangeListener};
pub use manager::TokenLifecycleManager;
