use std::fmt;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    domain::{CredentialManifest, Profile, ProfileId, ProfileUpdate},
    storage::{profile_store::ProfileStore, repository::StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileServiceError {
    ProfileNameDuplication(String),
    DataNotFound(String),
    Store(StoreError),
}

impl fmt::Display for ProfileServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileNameDuplication(name) => {
                write!(f, "profile with name {} already exists", name)
            }
            Self::DataNotFound(id) => write!(f, "profile {} not found", id),
            Self::Store(e) => write!(f, "profile store: {}", e),
        }
    }
}

impl std::error::Error for ProfileServiceError {}

impl From<StoreError> for ProfileServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DataNotFound(key) => Self::DataNotFound(key),
            other => Self::Store(other),
        }
    }
}

#[async_trait::async_trait]
pub trait ProfileService: Send + Sync {
    /// Stores a new profile. An empty id is replaced by a generated one.
    async fn create(
        &self,
        profile: Profile,
        credential_manifests: Vec<CredentialManifest>,
    ) -> Result<Profile, ProfileServiceError>;
    async fn update(&self, update: ProfileUpdate) -> Result<(), ProfileServiceError>;
    async fn delete(&self, id: &ProfileId) -> Result<(), ProfileServiceError>;
    async fn get_profile(&self, id: &ProfileId) -> Result<Profile, ProfileServiceError>;
    async fn activate_profile(&self, id: &ProfileId) -> Result<(), ProfileServiceError>;
    async fn deactivate_profile(&self, id: &ProfileId) -> Result<(), ProfileServiceError>;
    async fn get_all_profiles(&self, org_id: &str) -> Result<Vec<Profile>, ProfileServiceError>;
}

/// Profile service persisting through [`ProfileStore`]. Profile names are
/// unique within an organization.
pub struct StoredProfileService {
    store: ProfileStore,
    // read-modify-write sections run one at a time
    write_lock: Mutex<()>,
}

impl StoredProfileService {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    async fn set_active(&self, id: &ProfileId, active: bool) -> Result<(), ProfileServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut profile = self.store.get_profile(id).await?;
        profile.active = active;
        self.store.save_profile(&profile).await?;

        info!(profile_id = %id, active, "Profile activation changed");
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileService for StoredProfileService {
    async fn create(
        &self,
        mut profile: Profile,
        credential_manifests: Vec<CredentialManifest>,
    ) -> Result<Profile, ProfileServiceError> {
        let _guard = self.write_lock.lock().await;

        let duplicate = self.store.list_profiles().await?.into_iter().any(|p| {
            p.organization_id == profile.organization_id && p.name == profile.name
        });
        if duplicate {
            return Err(ProfileServiceError::ProfileNameDuplication(profile.name));
        }

        if profile.id.as_str().is_empty() {
            profile.id = ProfileId::generate();
        }

        if !credential_manifests.is_empty() {
            self.store
                .save_credential_manifests(&profile.id, &credential_manifests)
                .await?;
        }
        self.store.save_profile(&profile).await?;

        info!(profile_id = %profile.id, org_id = %profile.organization_id, "Profile created");
        Ok(profile)
    }

    async fn update(&self, update: ProfileUpdate) -> Result<(), ProfileServiceError> {
        let _guard = self.write_lock.lock().await;

        let mut profile = self.store.get_profile(&update.id).await?;

        if !update.name.is_empty() && update.name != profile.name {
            let duplicate = self.store.list_profiles().await?.into_iter().any(|p| {
                p.id != profile.id
                    && p.organization_id == profile.organization_id
                    && p.name == update.name
            });
            if duplicate {
                return Err(ProfileServiceError::ProfileNameDuplication(update.name));
            }
        }

        update.apply(&mut profile);
        self.store.save_profile(&profile).await?;

        debug!(profile_id = %profile.id, "Profile updated");
        Ok(())
    }

    async fn delete(&self, id: &ProfileId) -> Result<(), ProfileServiceError> {
        let _guard = self.write_lock.lock().await;

        self.store.get_profile(id).await?;
        self.store.delete_profile(id).await?;

        info!(profile_id = %id, "Profile deleted");
        Ok(())
    }

    async fn get_profile(&self, id: &ProfileId) -> Result<Profile, ProfileServiceError> {
        Ok(self.store.get_profile(id).await?)
    }

    async fn activate_profile(&self, id: &ProfileId) -> Result<(), ProfileServiceError> {
        self.set_active(id, true).await
    }

    async fn deactivate_profile(&self, id: &ProfileId) -> Result<(), ProfileServiceError> {
        self.set_active(id, false).await
    }

    async fn get_all_profiles(&self, org_id: &str) -> Result<Vec<Profile>, ProfileServiceError> {
        let mut profiles: Vec<Profile> = self
            .store
            .list_profiles()
            .await?
            .into_iter()
            .filter(|p| p.organization_id == org_id)
            .collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }
}
