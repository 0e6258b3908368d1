use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::storage::repository::*;

/// Redis storage adapter. Keys are stored verbatim, values as raw bytes.
#[derive(Clone)]
pub struct RedisStorage {
    connection: Arc<RwLock<MultiplexedConnection>>,
}

impl RedisStorage {
    pub async fn new(redis_url: &str) -> Result<Self, StoreError> {
        info!("Connecting to Redis");
        let client = Client::open(redis_url)
            .map_err(|e| StoreError::ConnectionFailed(format!("Invalid Redis URL: {}", e)))?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::ConnectionFailed(format!("Redis connect failed: {}", e)))?;

        Ok(Self {
            connection: Arc::new(RwLock::new(connection)),
        })
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStorage {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        debug!("Storing value with key: {}", key);

        let mut conn = self.connection.write().await;
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Redis SET failed: {}", e)))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        debug!("Reading value with key: {}", key);

        let mut conn = self.connection.write().await;
        let data: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Redis GET failed: {}", e)))?;

        data.ok_or_else(|| StoreError::DataNotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        debug!("Deleting value with key: {}", key);

        let mut conn = self.connection.write().await;
        let _: i32 = conn
            .del(key)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Redis DEL failed: {}", e)))?;

        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        debug!("Listing values with prefix: {}", prefix);

        let mut conn = self.connection.write().await;
        let keys: Vec<String> = conn
            .keys(format!("{}*", prefix))
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Redis KEYS failed: {}", e)))?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let data: Option<Vec<u8>> = conn
                .get(&key)
                .await
                .map_err(|e| StoreError::QueryFailed(format!("Redis GET failed: {}", e)))?;

            // removed between KEYS and GET
            if let Some(data) = data {
                entries.push((key, data));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(entries)
    }
}
