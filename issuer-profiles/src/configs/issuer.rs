use base64::{Engine, engine::general_purpose::STANDARD};
use ed25519_dalek::SigningKey;
use std::fmt;
use tracing::warn;

use super::{
    Configs,
    loaders::{environment::optional_env, load},
};

pub const SIGNING_KEY_SEED_LEN: usize = 32;

/// Key material of the local credential issuer.
#[derive(Clone)]
pub struct IssuerConfig {
    pub signing_key_seed: [u8; SIGNING_KEY_SEED_LEN],
    pub is_ephemeral_key: bool,
}

impl fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("signing_key_seed", &"<redacted>")
            .field("is_ephemeral_key", &self.is_ephemeral_key)
            .finish()
    }
}

pub fn parse_signing_key_seed(
    encoded: &str,
) -> Result<[u8; SIGNING_KEY_SEED_LEN], Box<dyn std::error::Error + Send + Sync>> {
    let bytes = STANDARD.decode(encoded.trim())?;
    let seed: [u8; SIGNING_KEY_SEED_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
        format!(
            "Signing key seed must be {} bytes, got {}",
            SIGNING_KEY_SEED_LEN,
            b.len()
        )
    })?;
    Ok(seed)
}

pub fn generate_signing_key_seed() -> [u8; SIGNING_KEY_SEED_LEN] {
    let mut csprng = rand::rngs::OsRng;
    SigningKey::generate(&mut csprng).to_bytes()
}

#[async_trait::async_trait]
impl Configs for IssuerConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        match optional_env("ISSUER_SIGNING_KEY") {
            Some(uri) => {
                let encoded = load(&uri).await?;
                Ok(IssuerConfig {
                    signing_key_seed: parse_signing_key_seed(&encoded)?,
                    is_ephemeral_key: false,
                })
            }
            None => {
                warn!(
                    "Missing environment variable: ISSUER_SIGNING_KEY. Credentials are signed with an ephemeral key"
                );
                Ok(IssuerConfig {
                    signing_key_seed: generate_signing_key_seed(),
                    is_ephemeral_key: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_parse_seed() {
        let encoded = STANDARD.encode([7u8; 32]);
        assert_eq!(parse_signing_key_seed(&encoded).unwrap(), [7u8; 32]);
    }

    #[test]
    fn test_parse_seed_wrong_length() {
        let encoded = STANDARD.encode([7u8; 16]);
        let err = parse_signing_key_seed(&encoded).unwrap_err();
        assert!(err.to_string().contains("must be 32 bytes"));
    }

    #[test]
    fn test_generated_seed_round_trips_through_env_encoding() {
        let seed = generate_signing_key_seed();
        assert_ne!(seed, generate_signing_key_seed());
        assert_eq!(parse_signing_key_seed(&STANDARD.encode(seed)).unwrap(), seed);
    }

    #[test]
    fn test_parse_seed_not_base64() {
        assert!(parse_signing_key_seed("***").is_err());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_without_key_is_ephemeral() {
        unsafe {
            env::remove_var("ISSUER_SIGNING_KEY");
        }
        let first = IssuerConfig::load().await.unwrap();
        let second = IssuerConfig::load().await.unwrap();
        assert!(first.is_ephemeral_key);
        assert_ne!(first.signing_key_seed, second.signing_key_seed);
    }

    #[tokio::test]
    #[serial]
    async fn test_load_key_from_string_uri() {
        unsafe {
            env::set_var(
                "ISSUER_SIGNING_KEY",
                format!("string://{}", STANDARD.encode([1u8; 32])),
            );
        }
        let config = IssuerConfig::load().await.unwrap();
        assert!(!config.is_ephemeral_key);
        assert_eq!(config.signing_key_seed, [1u8; 32]);
        assert!(!format!("{:?}", config).contains("[1"));

        unsafe {
            env::remove_var("ISSUER_SIGNING_KEY");
        }
    }
}
