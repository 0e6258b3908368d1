use std::env;

use super::Configs;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_REGION: &str = "ap-southeast-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Redis,
    DynamoDb,
}

#[derive(Debug, Clone, Default)]
pub struct RedisStorageConfig {
    pub is_enabled: bool,
    pub redis_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct DynamoDbStorageConfig {
    pub is_enabled: bool,
    pub table_name: String,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub redis_storage_config: RedisStorageConfig,
    pub ddb_storage_config: DynamoDbStorageConfig,
    pub storage_backend: StorageBackend,
}

fn parse_storage_backend(value: &str) -> StorageBackend {
    match value.to_lowercase().as_str() {
        "redis" => StorageBackend::Redis,
        "dynamodb" | "ddb" => StorageBackend::DynamoDb,
        _ => StorageBackend::Memory,
    }
}

fn load_storage_backend() -> StorageBackend {
    parse_storage_backend(&env::var("STORAGE_BACKEND").unwrap_or("memory".to_string()))
}

#[async_trait::async_trait]
impl Configs for RedisStorageConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if load_storage_backend() == StorageBackend::Redis {
            // the URL may embed credentials, so it goes through the secret loaders
            let redis_url = match env::var("REDIS_URL") {
                Ok(uri) => super::loaders::load(&uri).await?,
                Err(_) => DEFAULT_REDIS_URL.to_string(),
            };
            Ok(RedisStorageConfig {
                is_enabled: true,
                redis_url: redis_url.trim().to_string(),
            })
        } else {
            Ok(Default::default())
        }
    }
}

#[async_trait::async_trait]
impl Configs for DynamoDbStorageConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if load_storage_backend() == StorageBackend::DynamoDb {
            Ok(DynamoDbStorageConfig {
                is_enabled: true,
                table_name: env::var("DDB_TABLE_NAME")
                    .map_err(|_| "Missing required environment variable: DDB_TABLE_NAME")?,
                region: Some(env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string())),
                profile: env::var("AWS_PROFILE").ok(),
                endpoint_url: env::var("AWS_ENDPOINT")
                    .or_else(|_| env::var("DYNAMODB_ENDPOINT"))
                    .ok(),
            })
        } else {
            Ok(Default::default())
        }
    }
}

#[async_trait::async_trait]
impl Configs for StorageConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let storage_backend = load_storage_backend();
        Ok(StorageConfig {
            redis_storage_config: RedisStorageConfig::load().await?,
            ddb_storage_config: DynamoDbStorageConfig::load().await?,
            storage_backend,
        })
    }
}
