use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::VcFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    #[serde(rename = "ED25519")]
    Ed25519,
    #[serde(rename = "ECDSAP256DER")]
    EcdsaP256Der,
    #[serde(rename = "ECDSAP256IEEEP1363")]
    EcdsaP256Ieee,
    #[serde(rename = "ECDSAP384DER")]
    EcdsaP384Der,
    #[serde(rename = "ECDSAP384IEEEP1363")]
    EcdsaP384Ieee,
    #[serde(rename = "ECDSASecp256k1DER")]
    EcdsaSecp256k1Der,
    #[serde(rename = "ECDSASecp256k1IEEEP1363")]
    EcdsaSecp256k1Ieee,
    #[serde(rename = "BLS12381G2")]
    Bls12381G2,
    #[serde(rename = "RSAPS256")]
    RsaPs256,
    #[serde(rename = "RSARS256")]
    RsaRs256,
}

impl KeyType {
    pub const ALL: [KeyType; 10] = [
        KeyType::Ed25519,
        KeyType::EcdsaP256Der,
        KeyType::EcdsaP256Ieee,
        KeyType::EcdsaP384Der,
        KeyType::EcdsaP384Ieee,
        KeyType::EcdsaSecp256k1Der,
        KeyType::EcdsaSecp256k1Ieee,
        KeyType::Bls12381G2,
        KeyType::RsaPs256,
        KeyType::RsaRs256,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ED25519",
            Self::EcdsaP256Der => "ECDSAP256DER",
            Self::EcdsaP256Ieee => "ECDSAP256IEEEP1363",
            Self::EcdsaP384Der => "ECDSAP384DER",
            Self::EcdsaP384Ieee => "ECDSAP384IEEEP1363",
            Self::EcdsaSecp256k1Der => "ECDSASecp256k1DER",
            Self::EcdsaSecp256k1Ieee => "ECDSASecp256k1IEEEP1363",
            Self::Bls12381G2 => "BLS12381G2",
            Self::RsaPs256 => "RSAPS256",
            Self::RsaRs256 => "RSARS256",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unsupported key type {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureType {
    #[serde(rename = "EdDSA")]
    EdDsa,
    #[serde(rename = "ES256K")]
    Es256k,
    #[serde(rename = "ES256")]
    Es256,
    #[serde(rename = "ES384")]
    Es384,
    #[serde(rename = "PS256")]
    Ps256,
    Ed25519Signature2018,
    Ed25519Signature2020,
    EcdsaSecp256k1Signature2019,
    BbsBlsSignature2020,
    JsonWebSignature2020,
}

const ED25519_KEYS: &[KeyType] = &[KeyType::Ed25519];
const SECP256K1_KEYS: &[KeyType] = &[KeyType::EcdsaSecp256k1Der, KeyType::EcdsaSecp256k1Ieee];
const P256_KEYS: &[KeyType] = &[KeyType::EcdsaP256Der, KeyType::EcdsaP256Ieee];
const P384_KEYS: &[KeyType] = &[KeyType::EcdsaP384Der, KeyType::EcdsaP384Ieee];
const RSA_PS256_KEYS: &[KeyType] = &[KeyType::RsaPs256];
const BBS_KEYS: &[KeyType] = &[KeyType::Bls12381G2];
const JSON_WEB_SIGNATURE_KEYS: &[KeyType] = &[
    KeyType::Ed25519,
    KeyType::EcdsaSecp256k1Ieee,
    KeyType::EcdsaP256Ieee,
    KeyType::EcdsaP384Ieee,
    KeyType::RsaPs256,
];

impl SignatureType {
    pub const ALL: [SignatureType; 10] = [
        SignatureType::EdDsa,
        SignatureType::Es256k,
        SignatureType::Es256,
        SignatureType::Es384,
        SignatureType::Ps256,
        SignatureType::Ed25519Signature2018,
        SignatureType::Ed25519Signature2020,
        SignatureType::EcdsaSecp256k1Signature2019,
        SignatureType::BbsBlsSignature2020,
        SignatureType::JsonWebSignature2020,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::EdDsa => "EdDSA",
            Self::Es256k => "ES256K",
            Self::Es256 => "ES256",
            Self::Es384 => "ES384",
            Self::Ps256 => "PS256",
            Self::Ed25519Signature2018 => "Ed25519Signature2018",
            Self::Ed25519Signature2020 => "Ed25519Signature2020",
            Self::EcdsaSecp256k1Signature2019 => "EcdsaSecp256k1Signature2019",
            Self::BbsBlsSignature2020 => "BbsBlsSignature2020",
            Self::JsonWebSignature2020 => "JsonWebSignature2020",
        }
    }

    /// Credential format the algorithm belongs to.
    pub fn format(&self) -> VcFormat {
        match self {
            Self::EdDsa | Self::Es256k | Self::Es256 | Self::Es384 | Self::Ps256 => VcFormat::JwtVc,
            _ => VcFormat::LdpVc,
        }
    }

    /// Key types usable with the algorithm, preferred first.
    pub fn key_types(&self) -> &'static [KeyType] {
        match self {
            Self::EdDsa | Self::Ed25519Signature2018 | Self::Ed25519Signature2020 => ED25519_KEYS,
            Self::Es256k | Self::EcdsaSecp256k1Signature2019 => SECP256K1_KEYS,
            Self::Es256 => P256_KEYS,
            Self::Es384 => P384_KEYS,
            Self::Ps256 => RSA_PS256_KEYS,
            Self::BbsBlsSignature2020 => BBS_KEYS,
            Self::JsonWebSignature2020 => JSON_WEB_SIGNATURE_KEYS,
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    UnsupportedAlgorithm { format: VcFormat, algorithm: String },
    NoSupportedKeyType(SignatureType),
    UnsupportedKeyType {
        algorithm: SignatureType,
        key_type: String,
    },
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedAlgorithm { format, algorithm } => write!(
                f,
                "unsupported signature type {} by vc format {}",
                algorithm, format
            ),
            Self::NoSupportedKeyType(algorithm) => write!(
                f,
                "no supported linked key for signature type {}",
                algorithm
            ),
            Self::UnsupportedKeyType {
                algorithm,
                key_type,
            } => write!(
                f,
                "signature type {} does not support key type {}",
                algorithm, key_type
            ),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Resolves `algorithm` (case-insensitive) within the family of `format` and
/// checks the key manager can hold at least one key the algorithm needs.
pub fn validate_signature_algorithm(
    format: VcFormat,
    algorithm: &str,
    supported_key_types: &[KeyType],
) -> Result<SignatureType, SignatureError> {
    let signature_type = SignatureType::ALL
        .into_iter()
        .filter(|s| s.format() == format)
        .find(|s| s.name().eq_ignore_ascii_case(algorithm))
        .ok_or_else(|| SignatureError::UnsupportedAlgorithm {
            format,
            algorithm: algorithm.to_string(),
        })?;

    if !signature_type
        .key_types()
        .iter()
        .any(|k| supported_key_types.contains(k))
    {
        return Err(SignatureError::NoSupportedKeyType(signature_type));
    }

    Ok(signature_type)
}

/// An empty `key_type` falls back to the algorithm's preferred key type.
pub fn validate_signature_key_type(
    algorithm: SignatureType,
    key_type: &str,
) -> Result<KeyType, SignatureError> {
    if key_type.is_empty() {
        return Ok(algorithm.key_types()[0]);
    }

    algorithm
        .key_types()
        .iter()
        .copied()
        .find(|k| k.as_str().eq_ignore_ascii_case(key_type))
        .ok_or_else(|| SignatureError::UnsupportedKeyType {
            algorithm,
            key_type: key_type.to_string(),
        })
}
