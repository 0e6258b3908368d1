use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::{
    audit::{AuditLog, AuditLogBuilder, AuditLogger, AuditOperation},
    domain::{
        Credential, CredentialManifest, DidMethod, KeyType, KmsConfig, KmsType, Profile,
        ProfileId, ProfileUpdate, STATUS_LIST_2021_ENTRY, SignatureRepresentation, SigningOpts,
        VcConfig, VcFormat,
        signature::{validate_signature_algorithm, validate_signature_key_type},
    },
    http::{
        dto::{
            CreateIssuerProfileData, IssueCredentialData, IssueCredentialOptions, IssuerProfile,
            IssuerProfileList, KmsConfigDto, UpdateIssuerProfileData, VcConfigDto,
        },
        error::{ApiError, ErrorCode},
        extractors::OrgId,
    },
    service::{IssueCredentialService, KmsRegistry, ProfileService, ProfileServiceError},
};

const ISSUER_PROFILE_SVC_COMPONENT: &str = "issuer.ProfileService";
const ISSUER_KMS_REGISTRY_COMPONENT: &str = "kms.Registry";
const ISSUE_CREDENTIAL_SVC_COMPONENT: &str = "IssueCredentialService";

const VC_CONFIG_KEY_TYPE: &str = "vcConfig.keyType";
const VC_CONFIG_FORMAT: &str = "vcConfig.format";
const VC_CONFIG_SIGNING_ALGORITHM: &str = "vcConfig.signingAlgorithm";
const VC_CONFIG_DID_METHOD: &str = "vcConfig.didMethod";
const SIGNATURE_REPRESENTATION: &str = "signatureRepresentation";
const PROFILE_CREDENTIAL_MANIFESTS: &str = "credentialManifests";
const PROFILE_ORGANIZATION_ID: &str = "organizationID";
const PROFILE_NAME: &str = "name";
const PROFILE_URL: &str = "url";
const PROFILE: &str = "profile";

pub struct ControllerConfig {
    pub profile_svc: Arc<dyn ProfileService>,
    pub kms_registry: Arc<dyn KmsRegistry>,
    pub issue_credential_service: Arc<dyn IssueCredentialService>,
    pub audit_logger: Arc<dyn AuditLogger>,
}

/// Issuer profile management. Every operation is scoped to the caller's
/// organization; profiles of other organizations look like missing ones.
pub struct Controller {
    profile_svc: Arc<dyn ProfileService>,
    kms_registry: Arc<dyn KmsRegistry>,
    issue_credential_service: Arc<dyn IssueCredentialService>,
    audit_logger: Arc<dyn AuditLogger>,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            profile_svc: config.profile_svc,
            kms_registry: config.kms_registry,
            issue_credential_service: config.issue_credential_service,
            audit_logger: config.audit_logger,
        }
    }

    /// Passes the extracted organization through, recording rejected callers.
    pub async fn resolve_org_id(
        &self,
        operation: AuditOperation,
        org_id: Result<OrgId, ApiError>,
    ) -> Result<OrgId, ApiError> {
        if let Err(e) = &org_id {
            self.audit_logger
                .log(AuditLog::builder(operation).unauthorized(e.to_string()))
                .await;
        }
        org_id
    }

    pub async fn create_profile(
        &self,
        org_id: &OrgId,
        body: CreateIssuerProfileData,
    ) -> Result<IssuerProfile, ApiError> {
        let result = self.do_create_profile(org_id, body).await;

        let mut builder =
            AuditLog::builder(AuditOperation::CreateProfile).organization(org_id.as_str());
        if let Ok(created) = &result {
            builder = builder
                .profile_id(ProfileId::new(&created.id))
                .active(created.active);
        }
        self.audit(builder, &result).await;
        result
    }

    async fn do_create_profile(
        &self,
        org_id: &OrgId,
        mut body: CreateIssuerProfileData,
    ) -> Result<IssuerProfile, ApiError> {
        let raw_manifests = body.credential_manifests.take();
        let profile = self.validate_create_profile_data(body, org_id)?;
        let credential_manifests = validate_credential_manifests(raw_manifests)?;

        let created = self
            .profile_svc
            .create(profile, credential_manifests)
            .await
            .map_err(|e| match e {
                ProfileServiceError::ProfileNameDuplication(_) => {
                    ApiError::already_exist(PROFILE_NAME, e)
                }
                other => ApiError::system(ISSUER_PROFILE_SVC_COMPONENT, "CreateProfile", other),
            })?;

        Ok(map_to_issuer_profile(&created))
    }

    pub async fn list_profiles(&self, org_id: &OrgId) -> Result<IssuerProfileList, ApiError> {
        let result = self
            .profile_svc
            .get_all_profiles(org_id.as_str())
            .await
            .map(|profiles| IssuerProfileList {
                profiles: profiles.iter().map(map_to_issuer_profile).collect(),
            })
            .map_err(|e| ApiError::system(ISSUER_PROFILE_SVC_COMPONENT, "GetAllProfiles", e));

        let builder =
            AuditLog::builder(AuditOperation::ListProfiles).organization(org_id.as_str());
        self.audit(builder, &result).await;
        result
    }

    pub async fn get_profile(
        &self,
        org_id: &OrgId,
        profile_id: &str,
    ) -> Result<IssuerProfile, ApiError> {
        let result = self.access_profile(profile_id, org_id).await;

        let mut builder = self.profile_audit(AuditOperation::GetProfile, org_id, profile_id);
        if let Ok(profile) = &result {
            builder = builder.profile(profile);
        }
        self.audit(builder, &result).await;
        result.map(|p| map_to_issuer_profile(&p))
    }

    pub async fn update_profile(
        &self,
        org_id: &OrgId,
        profile_id: &str,
        body: UpdateIssuerProfileData,
    ) -> Result<IssuerProfile, ApiError> {
        let result = self.do_update_profile(org_id, profile_id, body).await;

        let mut builder = self.profile_audit(AuditOperation::UpdateProfile, org_id, profile_id);
        if let Ok(updated) = &result {
            builder = builder.active(updated.active);
        }
        self.audit(builder, &result).await;
        result
    }

    async fn do_update_profile(
        &self,
        org_id: &OrgId,
        profile_id: &str,
        body: UpdateIssuerProfileData,
    ) -> Result<IssuerProfile, ApiError> {
        let profile = self.access_profile(profile_id, org_id).await?;

        let url = match body.url.filter(|url| !url.is_empty()) {
            Some(url) => validate_profile_url(url)?,
            None => String::new(),
        };

        self.profile_svc
            .update(ProfileUpdate {
                id: profile.id.clone(),
                name: body.name.unwrap_or_default(),
                url,
                oidc_config: body.oidc_config,
            })
            .await
            .map_err(|e| match e {
                ProfileServiceError::ProfileNameDuplication(_) => {
                    ApiError::already_exist(PROFILE_NAME, e)
                }
                other => ApiError::system(ISSUER_PROFILE_SVC_COMPONENT, "UpdateProfile", other),
            })?;

        let updated = self
            .profile_svc
            .get_profile(&profile.id)
            .await
            .map_err(|e| ApiError::system(ISSUER_PROFILE_SVC_COMPONENT, "GetProfile", e))?;

        Ok(map_to_issuer_profile(&updated))
    }

    pub async fn delete_profile(&self, org_id: &OrgId, profile_id: &str) -> Result<(), ApiError> {
        let result = match self.access_profile(profile_id, org_id).await {
            Ok(profile) => self
                .profile_svc
                .delete(&profile.id)
                .await
                .map_err(|e| ApiError::system(ISSUER_PROFILE_SVC_COMPONENT, "DeleteProfile", e)),
            Err(e) => Err(e),
        };

        let builder = self.profile_audit(AuditOperation::DeleteProfile, org_id, profile_id);
        self.audit(builder, &result).await;
        result
    }

    pub async fn activate_profile(&self, org_id: &OrgId, profile_id: &str) -> Result<(), ApiError> {
        let result = match self.access_profile(profile_id, org_id).await {
            Ok(profile) => self
                .profile_svc
                .activate_profile(&profile.id)
                .await
                .map_err(|e| ApiError::system(ISSUER_PROFILE_SVC_COMPONENT, "ActivateProfile", e)),
            Err(e) => Err(e),
        };

        let builder = self
            .profile_audit(AuditOperation::ActivateProfile, org_id, profile_id)
            .active(true);
        self.audit(builder, &result).await;
        result
    }

    pub async fn deactivate_profile(
        &self,
        org_id: &OrgId,
        profile_id: &str,
    ) -> Result<(), ApiError> {
        let result = match self.access_profile(profile_id, org_id).await {
            Ok(profile) => self
                .profile_svc
                .deactivate_profile(&profile.id)
                .await
                .map_err(|e| {
                    ApiError::system(ISSUER_PROFILE_SVC_COMPONENT, "DeactivateProfile", e)
                }),
            Err(e) => Err(e),
        };

        let builder = self
            .profile_audit(AuditOperation::DeactivateProfile, org_id, profile_id)
            .active(false);
        self.audit(builder, &result).await;
        result
    }

    pub async fn issue_credential(
        &self,
        org_id: &OrgId,
        profile_id: &str,
        body: IssueCredentialData,
    ) -> Result<Credential, ApiError> {
        let result = self.do_issue_credential(org_id, profile_id, body).await;
        let builder = self.profile_audit(AuditOperation::IssueCredential, org_id, profile_id);
        self.audit(builder, &result).await;
        result
    }

    async fn do_issue_credential(
        &self,
        org_id: &OrgId,
        profile_id: &str,
        body: IssueCredentialData,
    ) -> Result<Credential, ApiError> {
        let profile = self.access_profile(profile_id, org_id).await?;

        let credential = Credential::parse(&body.credential, &[profile.vc_config.format])
            .map_err(|e| ApiError::invalid_value("credential", e))?;

        let signing_opts = validate_issue_cred_options(body.options)?;

        debug!(profile_id = %profile.id, opts = signing_opts.len(), "Issuing credential");

        self.issue_credential_service
            .issue_credential(credential, signing_opts, &profile)
            .await
            .map_err(|e| ApiError::system(ISSUE_CREDENTIAL_SVC_COMPONENT, "IssueCredential", e))
    }

    /// Loads a profile owned by `org_id`.
    pub async fn access_profile(
        &self,
        profile_id: &str,
        org_id: &OrgId,
    ) -> Result<Profile, ApiError> {
        let not_found = || {
            ApiError::doesnt_exist(
                PROFILE,
                anyhow!("profile with given id {}, doesn't exist", profile_id),
            )
        };

        let profile = match self.profile_svc.get_profile(&ProfileId::new(profile_id)).await {
            Ok(profile) => profile,
            Err(ProfileServiceError::DataNotFound(_)) => return Err(not_found()),
            Err(e) => return Err(ApiError::system(ISSUER_PROFILE_SVC_COMPONENT, "GetProfile", e)),
        };

        if profile.organization_id != org_id.as_str() {
            return Err(not_found());
        }

        Ok(profile)
    }

    fn validate_create_profile_data(
        &self,
        body: CreateIssuerProfileData,
        org_id: &OrgId,
    ) -> Result<Profile, ApiError> {
        if body.organization_id != org_id.as_str() {
            return Err(ApiError::invalid_value(
                PROFILE_ORGANIZATION_ID,
                anyhow!(
                    "org id({}) from oidc does not match profile org id({})",
                    org_id,
                    body.organization_id
                ),
            ));
        }

        let kms_config = validate_kms_config(body.kms_config.as_ref())?;

        let key_manager = self
            .kms_registry
            .get_key_manager(kms_config.as_ref())
            .map_err(|e| ApiError::system(ISSUER_KMS_REGISTRY_COMPONENT, "GetKeyManager", e))?;

        let vc_config = validate_vc_config(&body.vc_config, key_manager.supported_key_types())?;

        let url = validate_profile_url(body.url)?;

        Ok(Profile {
            id: ProfileId::default(),
            name: body.name,
            url,
            active: true,
            oidc_config: body.oidc_config,
            organization_id: body.organization_id,
            vc_config,
            kms_config,
            signing_did: None,
        })
    }

    fn profile_audit(
        &self,
        operation: AuditOperation,
        org_id: &OrgId,
        profile_id: &str,
    ) -> AuditLogBuilder {
        AuditLog::builder(operation)
            .organization(org_id.as_str())
            .profile_id(ProfileId::new(profile_id))
    }

    async fn audit<T>(&self, builder: AuditLogBuilder, result: &Result<T, ApiError>) {
        let audit_log = match result {
            Ok(_) => builder.succeeded(),
            Err(e) => match e.code() {
                ErrorCode::Unauthorized => builder.unauthorized(e.to_string()),
                ErrorCode::SystemError => builder.errored(e.failed_call(), e.to_string()),
                code => builder.rejected(
                    code.as_str(),
                    e.incorrect_value().map(str::to_string),
                    e.to_string(),
                ),
            },
        };
        self.audit_logger.log(audit_log).await;
    }
}

/// Profile URLs must be absolute and end with `/` so that `url + id` is well formed.
fn validate_profile_url(mut url: String) -> Result<String, ApiError> {
    if !url.ends_with('/') {
        url.push('/');
    }
    url::Url::parse(&url).map_err(|e| ApiError::invalid_value(PROFILE_URL, e))?;
    Ok(url)
}

/// `None` selects the server default KMS.
pub fn validate_kms_config(config: Option<&KmsConfigDto>) -> Result<Option<KmsConfig>, ApiError> {
    let Some(config) = config else {
        return Ok(None);
    };

    let kms_type = config
        .kms_type
        .parse::<KmsType>()
        .map_err(|e| ApiError::invalid_value("kmsConfig.type", anyhow!(e)))?;

    let kms_config = match kms_type {
        KmsType::Web | KmsType::Aws => KmsConfig {
            kms_type,
            endpoint: required_field(&config.endpoint, "kmsConfig.endpoint")?,
            secret_lock_key_path: String::new(),
            db_type: String::new(),
            db_url: String::new(),
            db_prefix: String::new(),
        },
        KmsType::Local => KmsConfig {
            kms_type,
            endpoint: String::new(),
            secret_lock_key_path: required_field(
                &config.secret_lock_key_path,
                "kmsConfig.secretLockKeyPath",
            )?,
            db_type: required_field(&config.db_type, "kmsConfig.dbType")?,
            db_url: required_field(&config.db_url, "kmsConfig.dbURL")?,
            db_prefix: required_field(&config.db_prefix, "kmsConfig.dbPrefix")?,
        },
    };

    Ok(Some(kms_config))
}

fn required_field(value: &Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::invalid_value(field, anyhow!("{} is required", field)))
}

pub fn validate_vc_config(
    vc_config: &VcConfigDto,
    supported_key_types: &[KeyType],
) -> Result<VcConfig, ApiError> {
    let format = vc_config
        .format
        .parse::<VcFormat>()
        .map_err(|e| ApiError::invalid_value(VC_CONFIG_FORMAT, anyhow!(e)))?;

    let signing_algorithm =
        validate_signature_algorithm(format, &vc_config.signing_algorithm, supported_key_types)
            .map_err(|e| {
                ApiError::invalid_value(
                    VC_CONFIG_SIGNING_ALGORITHM,
                    anyhow!("issuer profile service: create profile failed {}", e),
                )
            })?;

    let key_type =
        validate_signature_key_type(signing_algorithm, vc_config.key_type.as_deref().unwrap_or(""))
            .map_err(|e| {
                ApiError::invalid_value(
                    VC_CONFIG_KEY_TYPE,
                    anyhow!("issuer profile service: create profile failed {}", e),
                )
            })?;

    let did_method = vc_config
        .did_method
        .parse::<DidMethod>()
        .map_err(|e| ApiError::invalid_value(VC_CONFIG_DID_METHOD, anyhow!(e)))?;

    let signature_representation = match vc_config.signature_representation.as_deref() {
        None => SignatureRepresentation::default(),
        Some(representation) => representation
            .parse::<SignatureRepresentation>()
            .map_err(|e| ApiError::invalid_value(SIGNATURE_REPRESENTATION, anyhow!(e)))?,
    };

    Ok(VcConfig {
        format,
        signing_algorithm,
        key_type,
        did_method,
        signature_representation,
        status: vc_config.status.clone(),
        context: vc_config.contexts.clone().unwrap_or_default(),
    })
}

pub fn validate_credential_manifests(
    credential_manifests: Option<Vec<Value>>,
) -> Result<Vec<CredentialManifest>, ApiError> {
    credential_manifests
        .unwrap_or_default()
        .into_iter()
        .map(|manifest| {
            CredentialManifest::decode(manifest).map_err(|e| {
                ApiError::invalid_value(
                    PROFILE_CREDENTIAL_MANIFESTS,
                    anyhow!("validate credentials: {}", e),
                )
            })
        })
        .collect()
}

pub fn validate_issue_cred_options(
    options: Option<IssueCredentialOptions>,
) -> Result<Vec<SigningOpts>, ApiError> {
    let mut signing_opts = Vec::new();

    let Some(options) = options else {
        return Ok(signing_opts);
    };

    if let Some(status) = &options.credential_status {
        if !status.status_type.is_empty() && status.status_type != STATUS_LIST_2021_ENTRY {
            return Err(ApiError::invalid_value(
                "options.credentialStatus",
                anyhow!("not supported credential status type : {}", status.status_type),
            ));
        }
    }

    if let Some(verification_method) = options.verification_method {
        signing_opts.push(SigningOpts::VerificationMethod(verification_method));
    }

    if let Some(created) = options.created {
        let created = DateTime::parse_from_rfc3339(&created)
            .map_err(|e| ApiError::invalid_value("options.created", e))?;
        signing_opts.push(SigningOpts::Created(created.with_timezone(&Utc)));
    }

    if let Some(challenge) = options.challenge {
        signing_opts.push(SigningOpts::Challenge(challenge));
    }

    if let Some(domain) = options.domain {
        signing_opts.push(SigningOpts::Domain(domain));
    }

    Ok(signing_opts)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

pub fn map_to_issuer_profile(profile: &Profile) -> IssuerProfile {
    let vc_config = &profile.vc_config;

    IssuerProfile {
        id: profile.id.to_string(),
        name: profile.name.clone(),
        url: format!("{}{}", profile.url, profile.id),
        active: profile.active,
        organization_id: profile.organization_id.clone(),
        kms_config: profile.kms_config.as_ref().map(|kms| KmsConfigDto {
            kms_type: kms.kms_type.to_string(),
            endpoint: non_empty(&kms.endpoint),
            secret_lock_key_path: non_empty(&kms.secret_lock_key_path),
            db_type: non_empty(&kms.db_type),
            db_url: non_empty(&kms.db_url),
            db_prefix: non_empty(&kms.db_prefix),
        }),
        vc_config: VcConfigDto {
            format: vc_config.format.to_string(),
            signing_algorithm: vc_config.signing_algorithm.name().to_string(),
            key_type: Some(vc_config.key_type.to_string()),
            did_method: vc_config.did_method.to_string(),
            signature_representation: Some(vc_config.signature_representation.to_string()),
            status: vc_config.status.clone(),
            contexts: Some(vc_config.context.clone()),
            signing_did: profile.signing_did.as_ref().map(|d| d.did.clone()),
        },
        oidc_config: profile.oidc_config.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SignatureType, SigningDid, tests::sample_profile};
    use serde_json::json;

    fn vc_config_dto(format: &str, algorithm: &str) -> VcConfigDto {
        VcConfigDto {
            format: format.to_string(),
            signing_algorithm: algorithm.to_string(),
            did_method: "orb".to_string(),
            ..Default::default()
        }
    }

    fn assert_invalid(err: ApiError, field: &str) {
        assert_eq!(err.code(), ErrorCode::InvalidValue);
        assert_eq!(err.incorrect_value(), Some(field));
    }

    #[test]
    fn test_validate_vc_config_defaults() {
        let config = validate_vc_config(&vc_config_dto("ldp_vc", "ed25519signature2018"), &KeyType::ALL)
            .unwrap();

        assert_eq!(config.signing_algorithm, SignatureType::Ed25519Signature2018);
        assert_eq!(config.key_type, KeyType::Ed25519);
        assert_eq!(config.did_method, DidMethod::Orb);
        assert_eq!(
            config.signature_representation,
            SignatureRepresentation::ProofValue
        );
        assert!(config.context.is_empty());
    }

    #[test]
    fn test_validate_vc_config_field_errors() {
        assert_invalid(
            validate_vc_config(&vc_config_dto("mso_mdoc", "EdDSA"), &KeyType::ALL).unwrap_err(),
            VC_CONFIG_FORMAT,
        );
        // LDP algorithm under the JWT family
        assert_invalid(
            validate_vc_config(
                &vc_config_dto("jwt_vc", "Ed25519Signature2018"),
                &KeyType::ALL,
            )
            .unwrap_err(),
            VC_CONFIG_SIGNING_ALGORITHM,
        );
        assert_invalid(
            validate_vc_config(&vc_config_dto("jwt_vc", "EdDSA"), &[KeyType::EcdsaP256Der])
                .unwrap_err(),
            VC_CONFIG_SIGNING_ALGORITHM,
        );

        let mut dto = vc_config_dto("jwt_vc", "ES256");
        dto.key_type = Some("ED25519".to_string());
        assert_invalid(
            validate_vc_config(&dto, &KeyType::ALL).unwrap_err(),
            VC_CONFIG_KEY_TYPE,
        );

        let mut dto = vc_config_dto("jwt_vc", "EdDSA");
        dto.did_method = "ion".to_string();
        assert_invalid(
            validate_vc_config(&dto, &KeyType::ALL).unwrap_err(),
            VC_CONFIG_DID_METHOD,
        );

        let mut dto = vc_config_dto("jwt_vc", "EdDSA");
        dto.signature_representation = Some("Detached".to_string());
        assert_invalid(
            validate_vc_config(&dto, &KeyType::ALL).unwrap_err(),
            SIGNATURE_REPRESENTATION,
        );
    }

    #[test]
    fn test_validate_kms_config() {
        assert_eq!(validate_kms_config(None).unwrap(), None);

        let web = KmsConfigDto {
            kms_type: "web".to_string(),
            endpoint: Some("https://kms.example.com".to_string()),
            ..Default::default()
        };
        let config = validate_kms_config(Some(&web)).unwrap().unwrap();
        assert_eq!(config.kms_type, KmsType::Web);
        assert_eq!(config.endpoint, "https://kms.example.com");

        let aws = KmsConfigDto {
            kms_type: "aws".to_string(),
            ..Default::default()
        };
        assert_invalid(
            validate_kms_config(Some(&aws)).unwrap_err(),
            "kmsConfig.endpoint",
        );

        let local = KmsConfigDto {
            kms_type: "local".to_string(),
            secret_lock_key_path: Some("/keys/lock".to_string()),
            db_type: Some("leveldb".to_string()),
            db_url: Some("/data/kms".to_string()),
            ..Default::default()
        };
        assert_invalid(
            validate_kms_config(Some(&local)).unwrap_err(),
            "kmsConfig.dbPrefix",
        );

        let vault = KmsConfigDto {
            kms_type: "vault".to_string(),
            ..Default::default()
        };
        assert_invalid(validate_kms_config(Some(&vault)).unwrap_err(), "kmsConfig.type");
    }

    #[test]
    fn test_validate_issue_cred_options() {
        assert!(validate_issue_cred_options(None).unwrap().is_empty());

        let options = IssueCredentialOptions {
            verification_method: Some("did:orb:abc#key-1".to_string()),
            created: Some("2022-06-01T12:00:00Z".to_string()),
            challenge: Some("challenge".to_string()),
            domain: Some("example.com".to_string()),
            credential_status: Some(crate::http::dto::CredentialStatus {
                status_type: STATUS_LIST_2021_ENTRY.to_string(),
            }),
        };
        let opts = validate_issue_cred_options(Some(options)).unwrap();
        assert_eq!(opts.len(), 4);
        assert_eq!(
            opts[0],
            SigningOpts::VerificationMethod("did:orb:abc#key-1".to_string())
        );
    }

    #[test]
    fn test_validate_issue_cred_options_errors() {
        let options = IssueCredentialOptions {
            credential_status: Some(crate::http::dto::CredentialStatus {
                status_type: "RevocationList2020Status".to_string(),
            }),
            ..Default::default()
        };
        assert_invalid(
            validate_issue_cred_options(Some(options)).unwrap_err(),
            "options.credentialStatus",
        );

        let options = IssueCredentialOptions {
            created: Some("02-01-2022".to_string()),
            ..Default::default()
        };
        assert_invalid(
            validate_issue_cred_options(Some(options)).unwrap_err(),
            "options.created",
        );
    }

    #[test]
    fn test_validate_credential_manifests() {
        assert!(validate_credential_manifests(None).unwrap().is_empty());

        let manifests = validate_credential_manifests(Some(vec![json!({
            "id": "m-1",
            "issuer": {"id": "did:example:1"},
            "output_descriptors": [{"id": "d-1", "schema": "https://example.com/s"}]
        })]))
        .unwrap();
        assert_eq!(manifests.len(), 1);

        assert_invalid(
            validate_credential_manifests(Some(vec![json!({"id": "m-1"})])).unwrap_err(),
            PROFILE_CREDENTIAL_MANIFESTS,
        );
    }

    #[test]
    fn test_validate_profile_url() {
        assert_eq!(
            validate_profile_url("https://issuer.example.com/profiles".to_string()).unwrap(),
            "https://issuer.example.com/profiles/"
        );
        assert_invalid(
            validate_profile_url("not a url".to_string()).unwrap_err(),
            PROFILE_URL,
        );
    }

    #[test]
    fn test_map_to_issuer_profile() {
        let mut profile = sample_profile("p-1", "org-1", "University");
        profile.signing_did = Some(SigningDid {
            did: "did:orb:abc".to_string(),
            creator: "did:orb:abc#key-1".to_string(),
        });
        profile.kms_config = Some(KmsConfig {
            kms_type: KmsType::Aws,
            endpoint: "https://kms.example.com".to_string(),
            secret_lock_key_path: String::new(),
            db_type: String::new(),
            db_url: String::new(),
            db_prefix: String::new(),
        });

        let mapped = map_to_issuer_profile(&profile);

        assert_eq!(mapped.url, "https://issuer.example.com/p-1");
        assert_eq!(mapped.vc_config.signing_did.as_deref(), Some("did:orb:abc"));
        assert_eq!(mapped.vc_config.key_type.as_deref(), Some("ED25519"));
        let kms = mapped.kms_config.unwrap();
        assert_eq!(kms.kms_type, "aws");
        assert_eq!(kms.db_url, None);
    }
}
