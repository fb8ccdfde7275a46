//! Configuration management for the notifications service
//!
//! This crate defines the service configuration, loads it from YAML files and
//! environment variables, and applies registry updates to it.

pub mod loader;
pub mod schema;
pub mod shared;

pub use loader::ConfigLoader;
pub use schema::*;
pub use shared::SharedConfiguration;
