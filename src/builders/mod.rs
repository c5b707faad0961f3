//! Builders
//!
//! Fluent construction for configuration.

mod config;

pub use config::{broker_config, BrokerConfigBuilder};
