//! Notifications service configuration schema

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use types::{
    BootstrapConfiguration, ClientsInfo, ConfigError, Configuration, DatabaseConfiguration, DatabaseInfo,
    LoggingInfo, RegistryInfo, SecretStoreInfo, ServiceInfo, StartupInfo, UpdateError, UpdateResult,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationStruct {
    /// Settings that can change without a restart
    pub writable: WritableInfo,
    /// Downstream service clients by name
    pub clients: ClientsInfo,
    pub databases: DatabaseInfo,
    pub logging: LoggingInfo,
    pub registry: RegistryInfo,
    pub service: ServiceInfo,
    /// Outgoing mail relay
    pub smtp: SmtpInfo,
    pub secret_store: SecretStoreInfo,
    pub startup: StartupInfo,
}

/// Runtime-updatable settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WritableInfo {
    /// Number of times a failed notification is resent
    pub resend_limit: i32,
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub log_level: String,
}

impl WritableInfo {
    /// Translate the configured log level into a tracing filter
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        match self.log_level.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(LevelFilter::TRACE),
            "DEBUG" => Ok(LevelFilter::DEBUG),
            "INFO" => Ok(LevelFilter::INFO),
            "WARN" | "WARNING" => Ok(LevelFilter::WARN),
            "ERROR" => Ok(LevelFilter::ERROR),
            "OFF" => Ok(LevelFilter::OFF),
            _ => Err(ConfigError::InvalidValue {
                field: "writable.log_level".to_string(),
                value: self.log_level.clone(),
            }),
        }
    }
}

/// SMTP relay settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpInfo {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
    /// From address of outgoing mail
    pub sender: String,
    /// Accept self-signed certificates from the relay
    pub enable_self_signed_cert: bool,
    pub subject: String,
}

impl SmtpInfo {
    /// Username to authenticate with.
    ///
    /// Older configurations have no username and authenticate with the
    /// sender address, so an empty username falls back to `sender`.
    pub fn check_username(&self) -> &str {
        if !self.username.is_empty() {
            return &self.username;
        }
        &self.sender
    }
}

impl Configuration for ConfigurationStruct {
    type Writable = WritableInfo;

    fn update_from_raw(&mut self, candidate: Self) -> UpdateResult {
        // A zero port means the registry read did not populate anything
        if candidate.service.port == 0 {
            warn!("Rejected configuration update: service port is 0");
            return Err(UpdateError::ServicePortUnset);
        }

        *self = candidate;
        info!(
            service_port = self.service.port,
            log_level = %self.writable.log_level,
            "Configuration updated"
        );
        Ok(())
    }

    fn update_writable_from_raw(&mut self, candidate: WritableInfo) {
        self.writable = candidate;
        info!(
            resend_limit = self.writable.resend_limit,
            log_level = %self.writable.log_level,
            "Writable configuration updated"
        );
    }

    fn bootstrap(&self) -> BootstrapConfiguration {
        BootstrapConfiguration {
            clients: self.clients.clone(),
            service: self.service.clone(),
            registry: self.registry.clone(),
            logging: self.logging.clone(),
            secret_store: self.secret_store.clone(),
            startup: self.startup.clone(),
        }
    }

    fn log_level(&self) -> &str {
        &self.writable.log_level
    }

    fn set_registry_info(&mut self, info: RegistryInfo) {
        self.registry = info;
    }
}

impl DatabaseConfiguration for ConfigurationStruct {
    fn database_info(&self) -> DatabaseInfo {
        self.databases.clone()
    }
}
