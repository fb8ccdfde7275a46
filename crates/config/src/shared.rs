//! Shared, synchronized access to the service configuration
//!
//! [`ConfigurationStruct`] has no locking of its own. Subsystems that read
//! or update it concurrently hold a [`SharedConfiguration`] instead; every
//! replacement happens under one write lock so readers never see a partial
//! update.

use crate::schema::{ConfigurationStruct, WritableInfo};
use std::sync::Arc;
use tokio::sync::RwLock;
use types::{BootstrapConfiguration, Configuration, DatabaseConfiguration, DatabaseInfo, RegistryInfo, UpdateResult};

/// Cloneable handle to the live configuration
#[derive(Debug, Clone, Default)]
pub struct SharedConfiguration {
    inner: Arc<RwLock<ConfigurationStruct>>,
}

impl SharedConfiguration {
    pub fn new(config: ConfigurationStruct) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Replace the whole configuration if `candidate` was read successfully
    pub async fn update_from_raw(&self, candidate: ConfigurationStruct) -> UpdateResult {
        self.inner.write().await.update_from_raw(candidate)
    }

    /// Decode and apply an untyped whole-configuration candidate
    pub async fn update_from_value(&self, raw: serde_json::Value) -> UpdateResult {
        self.inner.write().await.update_from_value(raw)
    }

    pub async fn empty_writable(&self) -> WritableInfo {
        self.inner.read().await.empty_writable()
    }

    pub async fn update_writable_from_raw(&self, candidate: WritableInfo) {
        self.inner.write().await.update_writable_from_raw(candidate);
    }

    /// Decode and apply an untyped writable candidate
    pub async fn update_writable_from_value(&self, raw: serde_json::Value) -> UpdateResult {
        self.inner.write().await.update_writable_from_value(raw)
    }

    pub async fn bootstrap(&self) -> BootstrapConfiguration {
        self.inner.read().await.bootstrap()
    }

    pub async fn log_level(&self) -> String {
        self.inner.read().await.log_level().to_string()
    }

    pub async fn writable(&self) -> WritableInfo {
        self.inner.read().await.writable.clone()
    }

    pub async fn set_registry_info(&self, info: RegistryInfo) {
        self.inner.write().await.set_registry_info(info);
    }

    pub async fn database_info(&self) -> DatabaseInfo {
        self.inner.read().await.database_info()
    }

    /// Owned copy of the whole configuration
    pub async fn snapshot(&self) -> ConfigurationStruct {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ConfigLoader;
    use types::UpdateError;

    #[tokio::test]
    async fn test_initial_load_through_shared_handle() {
        let shared = SharedConfiguration::default();
        assert_eq!(shared.snapshot().await, ConfigurationStruct::default());

        shared.update_from_raw(ConfigLoader::example()).await.unwrap();

        assert_eq!(shared.snapshot().await, ConfigLoader::example());
        assert_eq!(shared.log_level().await, "INFO");
        assert_eq!(shared.bootstrap().await.service.port, 48060);
        assert_eq!(shared.database_info().await["Primary"].name, "notifications");
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_state() {
        let shared = SharedConfiguration::new(ConfigLoader::example());

        let mut candidate = ConfigLoader::example();
        candidate.service.port = 0;
        assert_eq!(
            shared.update_from_raw(candidate).await,
            Err(UpdateError::ServicePortUnset)
        );

        assert!(shared
            .update_writable_from_value(serde_json::json!({ "log_level": 7 }))
            .await
            .is_err());

        assert_eq!(shared.snapshot().await, ConfigLoader::example());
    }

    #[tokio::test]
    async fn test_clones_observe_writable_updates() {
        let shared = SharedConfiguration::new(ConfigLoader::example());
        let watcher_side = shared.clone();

        let mut writable = watcher_side.empty_writable().await;
        writable.resend_limit = 4;
        writable.log_level = "DEBUG".to_string();
        watcher_side.update_writable_from_raw(writable).await;

        assert_eq!(shared.log_level().await, "DEBUG");
        assert_eq!(shared.writable().await.resend_limit, 4);
        assert_eq!(shared.bootstrap().await, ConfigLoader::example().bootstrap());
    }

    #[tokio::test]
    async fn test_concurrent_writable_updates_are_whole() {
        let shared = SharedConfiguration::new(ConfigLoader::example());

        let mut handles = Vec::new();
        for i in 1..=16 {
            let shared = shared.clone();
            handles.push(tokio::spawn(async move {
                shared
                    .update_writable_from_value(serde_json::json!({
                        "resend_limit": i,
                        "log_level": format!("LEVEL{}", i),
                    }))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let writable = shared.writable().await;
        assert_eq!(writable.log_level, format!("LEVEL{}", writable.resend_limit));
    }

    #[tokio::test]
    async fn test_set_registry_info() {
        let shared = SharedConfiguration::new(ConfigLoader::example());
        shared
            .set_registry_info(RegistryInfo {
                host: "registry.internal".to_string(),
                port: 8501,
                registry_type: "consul".to_string(),
            })
            .await;

        let bootstrap = shared.bootstrap().await;
        assert_eq!(bootstrap.registry.host, "registry.internal");
        assert_eq!(bootstrap.registry.port, 8501);
    }
}
