//! Configuration sections shared by every service
//!
//! Services aggregate these records in their own configuration structs and
//! hand a subset of them to the bootstrap through [`crate::BootstrapConfiguration`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Connection details of a downstream service client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    /// Host name or address of the client service
    pub host: String,
    /// Port the client service listens on
    pub port: u16,
    /// Protocol used to reach the client (http, https)
    pub protocol: String,
}

impl ClientInfo {
    /// Base URL of the client service
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Named client connections, keyed by logical client name
pub type ClientsInfo = HashMap<String, ClientInfo>;

/// A single database connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub username: String,
    pub password: String,
    /// Database engine (mongodb, redisdb)
    #[serde(rename = "type")]
    pub db_type: String,
    /// Connection timeout in milliseconds
    pub timeout: u64,
    pub host: String,
    pub port: u16,
    /// Database name
    pub name: String,
}

/// Databases keyed by role (e.g. "Primary")
pub type DatabaseInfo = HashMap<String, Database>;

/// Logging destinations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingInfo {
    /// Forward log entries to the remote logging service
    pub enable_remote: bool,
    /// Local log file path
    pub file: String,
}

/// Location of the configuration registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryInfo {
    pub host: String,
    pub port: u16,
    /// Registry implementation (consul)
    #[serde(rename = "type")]
    pub registry_type: String,
}

/// Settings describing the hosting service itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceInfo {
    /// Time allowed for dependencies to become available, in milliseconds
    pub boot_timeout: u64,
    /// Health check interval, e.g. "10s"
    pub check_interval: String,
    /// Client monitor interval in milliseconds
    pub client_monitor: u64,
    pub host: String,
    pub port: u16,
    pub protocol: String,
    /// Message logged once the service has started
    pub startup_msg: String,
    /// Maximum number of results returned by a query
    pub max_result_count: u32,
    /// Request timeout in milliseconds
    pub timeout: u64,
}

impl ServiceInfo {
    /// Base URL of this service
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Authentication used against the secret store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticationInfo {
    pub auth_type: String,
    pub auth_token: String,
}

/// Secret store connection parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretStoreInfo {
    pub host: String,
    pub port: u16,
    /// Secret path prefix for this service
    pub path: String,
    pub protocol: String,
    pub root_ca_cert_path: String,
    pub server_name: String,
    pub token_file: String,
    pub additional_retry_attempts: u32,
    /// Wait between retries, e.g. "1s"
    pub retry_wait_period: String,
    pub authentication: AuthenticationInfo,
}

/// Startup retry policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupInfo {
    /// Total time to keep retrying, in seconds
    pub duration: u64,
    /// Delay between attempts, in seconds
    pub interval: u64,
}
