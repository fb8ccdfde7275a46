//! Configuration loader implementation

use crate::schema::{ConfigurationStruct, SmtpInfo, WritableInfo};
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use std::path::Path;
use tracing::debug;
use types::{
    AuthenticationInfo, ClientInfo, ConfigError, Database, LoggingInfo, RegistryInfo, SecretStoreInfo,
    ServiceInfo, StartupInfo,
};

/// Prefix of environment variables overriding file settings
pub const ENV_PREFIX: &str = "NOTIFICATIONS_";

/// Configuration loader that handles YAML files and environment variables
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<ConfigurationStruct> {
        let config_path = config_path.as_ref();

        if !config_path.exists() {
            return Err(ConfigError::FileNotFound {
                path: config_path.display().to_string(),
            }
            .into());
        }

        let config: ConfigurationStruct = Figment::new()
            .merge(Yaml::file(config_path))
            // NOTIFICATIONS_SERVICE__PORT overrides service.port
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to parse configuration")?;

        Self::validate(&config)?;
        debug!(path = %config_path.display(), "Configuration file read");

        Ok(config)
    }

    /// Load configuration from string (for testing)
    pub fn load_from_str(yaml_content: &str) -> Result<ConfigurationStruct> {
        let config: ConfigurationStruct = Figment::new()
            .merge(Yaml::string(yaml_content))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The only presence check: an unread configuration has no service port
    fn validate(config: &ConfigurationStruct) -> Result<()> {
        if config.service.port == 0 {
            return Err(ConfigError::MissingField {
                field: "service.port".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Sample configuration for a locally running service
    pub fn example() -> ConfigurationStruct {
        let mut clients = types::ClientsInfo::new();
        clients.insert(
            "Logging".to_string(),
            ClientInfo {
                host: "localhost".to_string(),
                port: 48061,
                protocol: "http".to_string(),
            },
        );

        let mut databases = types::DatabaseInfo::new();
        databases.insert(
            "Primary".to_string(),
            Database {
                username: "notifications".to_string(),
                password: "password".to_string(),
                db_type: "mongodb".to_string(),
                timeout: 5000,
                host: "localhost".to_string(),
                port: 27017,
                name: "notifications".to_string(),
            },
        );

        ConfigurationStruct {
            writable: WritableInfo {
                resend_limit: 2,
                log_level: "INFO".to_string(),
            },
            clients,
            databases,
            logging: LoggingInfo {
                enable_remote: false,
                file: "./logs/support-notifications.log".to_string(),
            },
            registry: RegistryInfo {
                host: "localhost".to_string(),
                port: 8500,
                registry_type: "consul".to_string(),
            },
            service: ServiceInfo {
                boot_timeout: 30000,
                check_interval: "10s".to_string(),
                client_monitor: 15000,
                host: "localhost".to_string(),
                port: 48060,
                protocol: "http".to_string(),
                startup_msg: "Support notifications service started".to_string(),
                max_result_count: 50000,
                timeout: 5000,
            },
            smtp: SmtpInfo {
                host: "smtp.gmail.com".to_string(),
                username: String::new(),
                password: "mypassword".to_string(),
                port: 587,
                sender: "jdoe@gmail.com".to_string(),
                enable_self_signed_cert: false,
                subject: "Notification".to_string(),
            },
            secret_store: SecretStoreInfo {
                host: "localhost".to_string(),
                port: 8200,
                path: "/v1/secret/notifications/".to_string(),
                protocol: "https".to_string(),
                root_ca_cert_path: "/vault/config/pki/ca.pem".to_string(),
                server_name: "vault".to_string(),
                token_file: "/vault/config/assets/resp-init.json".to_string(),
                additional_retry_attempts: 10,
                retry_wait_period: "1s".to_string(),
                authentication: AuthenticationInfo {
                    auth_type: "X-Vault-Token".to_string(),
                    auth_token: String::new(),
                },
            },
            startup: StartupInfo {
                duration: 30,
                interval: 1,
            },
        }
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yaml::to_string(&Self::example())
            .context("Failed to serialize example configuration")?;

        std::fs::write(path.as_ref(), yaml_content)
            .context("Failed to write example configuration file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_string() {
        let yaml_content = r#"
writable:
  resend_limit: 3
  log_level: "DEBUG"
service:
  host: "localhost"
  port: 48060
  protocol: "http"
clients:
  Logging:
    host: "logging"
    port: 48061
    protocol: "http"
smtp:
  host: "smtp.example.com"
  port: 587
  sender: "alerts@example.com"
"#;

        let config = ConfigLoader::load_from_str(yaml_content).unwrap();
        assert_eq!(config.writable.resend_limit, 3);
        assert_eq!(config.writable.log_level, "DEBUG");
        assert_eq!(config.service.port, 48060);
        assert_eq!(config.clients["Logging"].url(), "http://logging:48061");
        assert_eq!(config.smtp.check_username(), "alerts@example.com");
        assert!(config.databases.is_empty());
    }

    #[test]
    fn test_missing_service_port_is_rejected() {
        let yaml_content = r#"
writable:
  resend_limit: 2
  log_level: "INFO"
smtp:
  host: "smtp.example.com"
"#;
        let err = ConfigLoader::load_from_str(yaml_content).unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::MissingField { field }) => assert_eq!(field, "service.port"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_writable_is_rejected() {
        let yaml_content = r#"
writable:
  log_level: "INFO"
service:
  port: 48060
"#;
        let err = ConfigLoader::load_from_str(yaml_content).unwrap_err();
        assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::load("does/not/exist.yaml").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_create_example_round_trip() {
        let temp_file = NamedTempFile::new().unwrap();
        ConfigLoader::create_example(temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("writable:"));
        assert!(content.contains("smtp:"));

        // Jail keeps environment overrides from other tests out of this load
        figment::Jail::expect_with(|_jail| {
            let config = ConfigLoader::load(temp_file.path()).expect("example loads");
            assert_eq!(config, ConfigLoader::example());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "configuration.yaml",
                r#"
writable:
  resend_limit: 2
  log_level: "INFO"
service:
  host: "localhost"
  port: 48060
"#,
            )?;
            jail.set_env("NOTIFICATIONS_SERVICE__PORT", "9000");
            jail.set_env("NOTIFICATIONS_WRITABLE__LOG_LEVEL", "DEBUG");
            jail.set_env("NOTIFICATIONS_SMTP__SENDER", "ops@example.com");

            let config = ConfigLoader::load("configuration.yaml").expect("configuration loads");
            assert_eq!(config.service.port, 9000);
            assert_eq!(config.service.host, "localhost");
            assert_eq!(config.writable.log_level, "DEBUG");
            assert_eq!(config.writable.resend_limit, 2);
            assert_eq!(config.smtp.sender, "ops@example.com");
            Ok(())
        });
    }
}
