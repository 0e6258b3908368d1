use std::collections::HashMap;

use anyhow::Result as AnyResult;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::{Client, types::AttributeValue};
use aws_types::region::Region;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    configs::DynamoDbStorageConfig,
    storage::repository::{KeyValueStore, StoreError},
};

const PK_ATTR: &str = "PK";

/// One table row per key. Values are base64 so arbitrary bytes survive.
#[derive(Debug, Serialize, Deserialize)]
struct KvItem {
    #[serde(rename = "PK")]
    pk: String,
    #[serde(rename = "Value")]
    value: String,
}

impl KvItem {
    fn into_entry(self) -> Result<(String, Vec<u8>), StoreError> {
        let value = STANDARD.decode(&self.value).map_err(|e| {
            StoreError::SerializationFailed(format!("Invalid stored value for {}: {}", self.pk, e))
        })?;
        Ok((self.pk, value))
    }
}

#[derive(Clone)]
pub struct DynamoDbStorage {
    client: Client,
    table_name: String,
}

impl DynamoDbStorage {
    pub async fn new(config: DynamoDbStorageConfig) -> AnyResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let shared_config = loader.load().await;
        let client = Client::new(&shared_config);

        Ok(Self::with_client(client, config.table_name))
    }

    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn build_key(key: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([(PK_ATTR.to_string(), AttributeValue::S(key.to_string()))])
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl std::fmt::Debug for DynamoDbStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbStorage")
            .field("table_name", &self.table_name)
            .finish()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for DynamoDbStorage {
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        debug!(key, "Storing value in DynamoDB");

        let item: HashMap<String, AttributeValue> = serde_dynamo::to_item(KvItem {
            pk: key.to_string(),
            value: STANDARD.encode(value),
        })
        .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|err| StoreError::QueryFailed(format!("Failed to put item: {}", err)))?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        debug!(key, "Reading value from DynamoDB");

        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::build_key(key)))
            .send()
            .await
            .map_err(|err| {
                StoreError::ConnectionFailed(format!(
                    "Failed to fetch item from DynamoDB: {}",
                    err
                ))
            })?;

        let item = response
            .item
            .ok_or_else(|| StoreError::DataNotFound(key.to_string()))?;
        let kv: KvItem = serde_dynamo::from_item(item)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;

        kv.into_entry().map(|(_, value)| value)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        debug!(key, "Deleting value from DynamoDB");

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(Self::build_key(key)))
            .send()
            .await
            .map_err(|err| StoreError::QueryFailed(format!("Failed to delete item: {}", err)))?;

        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        debug!(prefix, "Scanning DynamoDB table");

        let mut entries = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression("begins_with(#pk, :prefix)")
                .expression_attribute_names("#pk", PK_ATTR)
                .expression_attribute_values(":prefix", AttributeValue::S(prefix.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|err| StoreError::QueryFailed(format!("Failed to scan table: {}", err)))?;

            for item in response.items.unwrap_or_default() {
                let kv: KvItem = serde_dynamo::from_item(item)
                    .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
                entries.push(kv.into_entry()?);
            }

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
