use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::JsonObject;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmsConfigDto {
    #[serde(rename = "type", default)]
    pub kms_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_lock_key_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_type: Option<String>,
    #[serde(default, rename = "dbURL", skip_serializing_if = "Option::is_none")]
    pub db_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_prefix: Option<String>,
}

/// Enumerated fields stay strings so validation can name the offending field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcConfigDto {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub signing_algorithm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(default)]
    pub did_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_representation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<String>>,
    #[serde(default, rename = "signingDID", skip_serializing_if = "Option::is_none")]
    pub signing_did: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssuerProfileData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "organizationID", default)]
    pub organization_id: String,
    #[serde(default)]
    pub kms_config: Option<KmsConfigDto>,
    #[serde(default)]
    pub vc_config: VcConfigDto,
    #[serde(default)]
    pub oidc_config: Option<JsonObject>,
    #[serde(default)]
    pub credential_manifests: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssuerProfileData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub oidc_config: Option<JsonObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerProfile {
    pub id: String,
    pub name: String,
    pub url: String,
    pub active: bool,
    #[serde(rename = "organizationID")]
    pub organization_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_config: Option<KmsConfigDto>,
    pub vc_config: VcConfigDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_config: Option<JsonObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerProfileList {
    pub profiles: Vec<IssuerProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialStatus {
    #[serde(rename = "type", default)]
    pub status_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCredentialOptions {
    #[serde(default)]
    pub verification_method: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub credential_status: Option<CredentialStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueCredentialData {
    pub credential: Value,
    #[serde(default)]
    pub options: Option<IssueCredentialOptions>,
}
