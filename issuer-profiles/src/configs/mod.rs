pub mod audit;
pub mod issuer;
pub mod loaders;
pub mod server;
pub mod storage;

pub use audit::{AuditConfig, AuditLogFormat};
pub use issuer::IssuerConfig;
pub use server::ServerConfig;
pub use storage::{DynamoDbStorageConfig, RedisStorageConfig, StorageBackend, StorageConfig};

#[async_trait::async_trait]
pub trait Configs: Sized {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug)]
pub struct IssuerProfilesConfig {
    pub server_config: ServerConfig,
    pub storage_config: StorageConfig,
    pub issuer_config: IssuerConfig,
    pub audit_config: AuditConfig,
}

#[async_trait::async_trait]
impl Configs for IssuerProfilesConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            server_config: ServerConfig::load().await?,
            storage_config: StorageConfig::load().await?,
            issuer_config: IssuerConfig::load().await?,
            audit_config: AuditConfig::load().await?,
        })
    }
}
