use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    ConnectionFailed(String),
    QueryFailed(String),
    SerializationFailed(String),
    DataNotFound(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            Self::QueryFailed(msg) => write!(f, "Query failed: {}", msg),
            Self::SerializationFailed(msg) => write!(f, "{}", msg),
            Self::DataNotFound(key) => write!(f, "data not found: {}", key),
        }
    }
}

impl std::error::Error for StoreError {}

/// Byte-oriented key-value store backing the profile records.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Fails with [`StoreError::DataNotFound`] when the key is absent.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}
