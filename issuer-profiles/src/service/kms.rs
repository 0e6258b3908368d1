use std::{fmt, sync::Arc};

use crate::domain::{KeyType, KmsConfig, KmsType};

const WEB_KMS_KEY_TYPES: &[KeyType] = &[
    KeyType::Ed25519,
    KeyType::EcdsaP256Ieee,
    KeyType::EcdsaP384Ieee,
    KeyType::EcdsaSecp256k1Ieee,
];

const AWS_KMS_KEY_TYPES: &[KeyType] = &[
    KeyType::EcdsaP256Der,
    KeyType::EcdsaP384Der,
    KeyType::EcdsaSecp256k1Der,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KmsError {
    InvalidConfig(String),
}

impl fmt::Display for KmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid kms config: {}", msg),
        }
    }
}

impl std::error::Error for KmsError {}

pub trait KeyManager: Send + Sync {
    fn kms_type(&self) -> KmsType;
    fn supported_key_types(&self) -> &[KeyType];
}

pub trait KmsRegistry: Send + Sync {
    /// `None` selects the server default key manager.
    fn get_key_manager(&self, config: Option<&KmsConfig>) -> Result<Arc<dyn KeyManager>, KmsError>;
}

struct StaticKeyManager {
    kms_type: KmsType,
    key_types: &'static [KeyType],
}

impl KeyManager for StaticKeyManager {
    fn kms_type(&self) -> KmsType {
        self.kms_type
    }

    fn supported_key_types(&self) -> &[KeyType] {
        self.key_types
    }
}

/// Describes the key types each KMS flavour can hold. Key material itself is
/// managed outside this service.
pub struct DefaultKmsRegistry {
    default_type: KmsType,
}

impl DefaultKmsRegistry {
    pub fn new(default_type: KmsType) -> Self {
        Self { default_type }
    }

    fn key_types(kms_type: KmsType) -> &'static [KeyType] {
        match kms_type {
            KmsType::Local => &KeyType::ALL,
            KmsType::Web => WEB_KMS_KEY_TYPES,
            KmsType::Aws => AWS_KMS_KEY_TYPES,
        }
    }
}

impl Default for DefaultKmsRegistry {
    fn default() -> Self {
        Self::new(KmsType::Local)
    }
}

impl KmsRegistry for DefaultKmsRegistry {
    fn get_key_manager(&self, config: Option<&KmsConfig>) -> Result<Arc<dyn KeyManager>, KmsError> {
        let kms_type = config.map_or(self.default_type, |c| c.kms_type);

        if let Some(config) = config {
            if matches!(kms_type, KmsType::Web | KmsType::Aws) && config.endpoint.is_empty() {
                return Err(KmsError::InvalidConfig(format!(
                    "{} kms requires an endpoint",
                    kms_type
                )));
            }
        }

        Ok(Arc::new(StaticKeyManager {
            kms_type,
            key_types: Self::key_types(kms_type),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kms_config(kms_type: KmsType, endpoint: &str) -> KmsConfig {
        KmsConfig {
            kms_type,
            endpoint: endpoint.to_string(),
            secret_lock_key_path: String::new(),
            db_type: String::new(),
            db_url: String::new(),
            db_prefix: String::new(),
        }
    }

    #[test]
    fn test_default_key_manager() {
        let registry = DefaultKmsRegistry::default();
        let manager = registry.get_key_manager(None).unwrap();
        assert_eq!(manager.kms_type(), KmsType::Local);
        assert_eq!(manager.supported_key_types().len(), KeyType::ALL.len());
    }

    #[test]
    fn test_aws_key_types() {
        let registry = DefaultKmsRegistry::default();
        let config = kms_config(KmsType::Aws, "https://kms.us-east-1.amazonaws.com");
        let manager = registry.get_key_manager(Some(&config)).unwrap();
        assert!(!manager.supported_key_types().contains(&KeyType::Ed25519));
        assert!(manager.supported_key_types().contains(&KeyType::EcdsaP256Der));
    }

    #[test]
    fn test_web_requires_endpoint() {
        let registry = DefaultKmsRegistry::default();
        let result = registry.get_key_manager(Some(&kms_config(KmsType::Web, "")));
        assert!(matches!(result, Err(KmsError::InvalidConfig(_))));
    }
}
