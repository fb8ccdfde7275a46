//! Contract between a service configuration and the bootstrap
//!
//! The bootstrap loads the initial configuration, watches the writable
//! subsection for live changes and reads the generic sections it needs for
//! its own startup work. Services expose their configuration to it through
//! [`Configuration`].

use crate::error::{UpdateError, UpdateResult};
use crate::schema::{ClientsInfo, DatabaseInfo, LoggingInfo, RegistryInfo, SecretStoreInfo, ServiceInfo, StartupInfo};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Configuration sections required by generic bootstrap logic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfiguration {
    pub clients: ClientsInfo,
    pub service: ServiceInfo,
    pub registry: RegistryInfo,
    pub logging: LoggingInfo,
    pub secret_store: SecretStoreInfo,
    pub startup: StartupInfo,
}

/// A service configuration the bootstrap can populate and update
pub trait Configuration: DeserializeOwned {
    /// Subsection that may change while the service runs
    type Writable: DeserializeOwned + Default;

    /// Replace the whole configuration with `candidate`.
    ///
    /// Rejects the candidate, leaving `self` untouched, when it does not
    /// look like the product of a successful read.
    fn update_from_raw(&mut self, candidate: Self) -> UpdateResult;

    /// Zero-valued writable subsection, the shape live updates decode into
    fn empty_writable(&self) -> Self::Writable {
        Self::Writable::default()
    }

    /// Replace only the writable subsection
    fn update_writable_from_raw(&mut self, candidate: Self::Writable);

    /// Owned copy of the sections used by the bootstrap
    fn bootstrap(&self) -> BootstrapConfiguration;

    /// Current log level from the writable subsection
    fn log_level(&self) -> &str;

    fn set_registry_info(&mut self, info: RegistryInfo);

    /// Decode an untyped candidate and apply it with [`Configuration::update_from_raw`]
    fn update_from_value(&mut self, raw: serde_json::Value) -> UpdateResult {
        let candidate: Self = serde_json::from_value(raw)
            .map_err(|e| UpdateError::shape_mismatch(short_type_name::<Self>(), e))?;
        self.update_from_raw(candidate)
    }

    /// Decode an untyped writable candidate and apply it with
    /// [`Configuration::update_writable_from_raw`]
    fn update_writable_from_value(&mut self, raw: serde_json::Value) -> UpdateResult {
        let candidate: Self::Writable = serde_json::from_value(raw)
            .map_err(|e| UpdateError::shape_mismatch(short_type_name::<Self::Writable>(), e))?;
        self.update_writable_from_raw(candidate);
        Ok(())
    }
}

/// Services backed by one or more databases
pub trait DatabaseConfiguration {
    fn database_info(&self) -> DatabaseInfo;
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
