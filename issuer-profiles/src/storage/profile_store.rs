use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::{CredentialManifest, Profile, ProfileId};
use crate::storage::repository::{KeyValueStore, StoreError};

pub const PROFILE_KEY_PREFIX: &str = "profile";
pub const MANIFESTS_KEY_PREFIX: &str = "credentialmanifests";

fn key(prefix: &str, id: &str) -> String {
    format!("{}_{}", prefix, id)
}

/// Persists issuer profiles as JSON under `profile_<id>` keys.
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(profile).map_err(|e| {
            StoreError::SerializationFailed(format!("save profile marshalling error: {}", e))
        })?;

        self.store
            .put(&key(PROFILE_KEY_PREFIX, profile.id.as_str()), bytes)
            .await
    }

    pub async fn get_profile(&self, id: &ProfileId) -> Result<Profile, StoreError> {
        let bytes = self
            .store
            .get(&key(PROFILE_KEY_PREFIX, id.as_str()))
            .await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::SerializationFailed(format!("get profile unmarshalling error: {}", e))
        })
    }

    pub async fn delete_profile(&self, id: &ProfileId) -> Result<(), StoreError> {
        self.store
            .delete(&key(MANIFESTS_KEY_PREFIX, id.as_str()))
            .await?;
        self.store.delete(&key(PROFILE_KEY_PREFIX, id.as_str())).await
    }

    /// Records that fail to decode are logged and skipped.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let entries = self
            .store
            .scan_prefix(&format!("{}_", PROFILE_KEY_PREFIX))
            .await?;

        let mut profiles = Vec::with_capacity(entries.len());
        for (key, bytes) in entries {
            match serde_json::from_slice::<Profile>(&bytes) {
                Ok(profile) => profiles.push(profile),
                Err(e) => error!("Failed to deserialize profile for key {}: {}", key, e),
            }
        }

        debug!("Listed {} profiles", profiles.len());
        Ok(profiles)
    }

    pub async fn save_credential_manifests(
        &self,
        id: &ProfileId,
        manifests: &[CredentialManifest],
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(manifests).map_err(|e| {
            StoreError::SerializationFailed(format!(
                "save credential manifests marshalling error: {}",
                e
            ))
        })?;

        self.store
            .put(&key(MANIFESTS_KEY_PREFIX, id.as_str()), bytes)
            .await
    }
}
