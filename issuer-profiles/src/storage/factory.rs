use std::sync::Arc;

use anyhow::anyhow;
use tracing::info;

use crate::{
    configs::{IssuerProfilesConfig, StorageBackend},
    storage::{
        adapters::{
            ddb_storage::DynamoDbStorage, local_storage::LocalStorage, redis_storage::RedisStorage,
        },
        repository::KeyValueStore,
    },
};

pub struct StorageRepoFactory {
    config: Arc<IssuerProfilesConfig>,
}

impl StorageRepoFactory {
    pub fn new(config: Arc<IssuerProfilesConfig>) -> Self {
        Self { config }
    }

    pub async fn create(
        &self,
    ) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error + Send + Sync>> {
        let backend = self.config.storage_config.storage_backend;
        info!("Initializing {:?} storage backend", backend);

        let store: Arc<dyn KeyValueStore> = match backend {
            StorageBackend::Memory => Arc::new(LocalStorage::new()),
            StorageBackend::DynamoDb => {
                let ddb_config = self.config.storage_config.ddb_storage_config.clone();
                let ddb = DynamoDbStorage::new(ddb_config)
                    .await
                    .map_err(|e| anyhow!(e.to_string()))?;
                Arc::new(ddb)
            }
            StorageBackend::Redis => {
                let redis_config = self.config.storage_config.redis_storage_config.clone();
                let redis = RedisStorage::new(&redis_config.redis_url)
                    .await
                    .map_err(|e| anyhow!(e.to_string()))?;
                Arc::new(redis)
            }
        };

        Ok(store)
    }
}
