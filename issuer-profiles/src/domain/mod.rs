use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

pub mod credential;
pub mod manifest;
pub mod signature;

pub use credential::{
    CREDENTIALS_V1_CONTEXT, Credential, CredentialError, STATUS_LIST_2021_ENTRY, SigningOpts,
};
pub use manifest::{CredentialManifest, ManifestError, ManifestIssuer, OutputDescriptor};
pub use signature::{KeyType, SignatureError, SignatureType};

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VcFormat {
    #[serde(rename = "jwt_vc")]
    JwtVc,
    #[serde(rename = "ldp_vc")]
    LdpVc,
}

impl VcFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JwtVc => "jwt_vc",
            Self::LdpVc => "ldp_vc",
        }
    }
}

impl fmt::Display for VcFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VcFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jwt_vc" => Ok(Self::JwtVc),
            "ldp_vc" => Ok(Self::LdpVc),
            _ => Err(format!(
                "unsupported vc format {s}, use one of next [jwt_vc, ldp_vc]"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DidMethod {
    Orb,
    Web,
    Key,
}

impl DidMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orb => "orb",
            Self::Web => "web",
            Self::Key => "key",
        }
    }
}

impl fmt::Display for DidMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DidMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orb" => Ok(Self::Orb),
            "web" => Ok(Self::Web),
            "key" => Ok(Self::Key),
            _ => Err(format!(
                "unsupported did method {s}, use one of next [orb, web, key]"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SignatureRepresentation {
    #[serde(rename = "JWS")]
    Jws,
    #[default]
    ProofValue,
}

impl SignatureRepresentation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jws => "JWS",
            Self::ProofValue => "ProofValue",
        }
    }
}

impl fmt::Display for SignatureRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureRepresentation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JWS" => Ok(Self::Jws),
            "ProofValue" => Ok(Self::ProofValue),
            _ => Err(format!(
                "unsupported signatureRepresentation {s}, use one of next [JWS, ProofValue]"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KmsType {
    Local,
    Web,
    Aws,
}

impl KmsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Web => "web",
            Self::Aws => "aws",
        }
    }
}

impl fmt::Display for KmsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KmsType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "web" => Ok(Self::Web),
            "aws" => Ok(Self::Aws),
            _ => Err(format!(
                "unsupported kms type {s}, use one of next [local, web, aws]"
            )),
        }
    }
}

/// Key management settings of a profile. `None` on the profile means the
/// server-wide default KMS is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmsConfig {
    pub kms_type: KmsType,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub secret_lock_key_path: String,
    #[serde(default)]
    pub db_type: String,
    #[serde(default, rename = "dbURL")]
    pub db_url: String,
    #[serde(default)]
    pub db_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningDid {
    pub did: String,
    pub creator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcConfig {
    pub format: VcFormat,
    pub signing_algorithm: SignatureType,
    pub key_type: KeyType,
    pub did_method: DidMethod,
    #[serde(default)]
    pub signature_representation: SignatureRepresentation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JsonObject>,
    #[serde(default)]
    pub context: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub url: String,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_config: Option<JsonObject>,
    #[serde(rename = "organizationID")]
    pub organization_id: String,
    pub vc_config: VcConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_config: Option<KmsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_did: Option<SigningDid>,
}

impl Profile {
    /// DID placed into the `issuer` field of issued credentials.
    pub fn issuer_did(&self) -> String {
        match &self.signing_did {
            Some(signing_did) => signing_did.did.clone(),
            None => format!("did:{}:{}", self.vc_config.did_method, self.id),
        }
    }
}

/// Partial update of a profile. Empty strings and `None` keep the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub id: ProfileId,
    pub name: String,
    pub url: String,
    pub oidc_config: Option<JsonObject>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut Profile) {
        if !self.name.is_empty() {
            profile.name = self.name;
        }
        if !self.url.is_empty() {
            profile.url = self.url;
        }
        if let Some(oidc_config) = self.oidc_config {
            profile.oidc_config = Some(oidc_config);
        }
    }
}
