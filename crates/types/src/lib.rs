//! Shared configuration types for the notifications service
//!
//! This crate contains the configuration sections common to every service,
//! the bootstrap contract and the error types used by the configuration crate.

pub mod bootstrap;
pub mod error;
pub mod schema;

// Re-export commonly used types
pub use bootstrap::{BootstrapConfiguration, Configuration, DatabaseConfiguration};
pub use error::{ConfigError, UpdateError, UpdateResult};
pub use schema::*;
