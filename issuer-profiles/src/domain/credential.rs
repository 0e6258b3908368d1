use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::fmt;

use super::{JsonObject, VcFormat};

pub const CREDENTIALS_V1_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";
pub const STATUS_LIST_2021_ENTRY: &str = "StatusList2021Entry";

/// Per-request options handed to the issuance service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningOpts {
    VerificationMethod(String),
    Created(DateTime<Utc>),
    Challenge(String),
    Domain(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    UnsupportedFormat(VcFormat),
    Malformed(String),
    MissingField(&'static str),
    InvalidField { field: &'static str, reason: String },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(format) => {
                write!(f, "credential format {} is not supported by profile", format)
            }
            Self::Malformed(msg) => write!(f, "malformed credential: {}", msg),
            Self::MissingField(field) => write!(f, "missing required field {}", field),
            Self::InvalidField { field, reason } => {
                write!(f, "invalid field {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for CredentialError {}

/// A verifiable credential kept as its JSON object. Once signed in JWT form
/// the compact serialization travels alongside the claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    content: JsonObject,
    format: VcFormat,
    jwt: Option<String>,
}

impl Credential {
    pub fn new(content: JsonObject, format: VcFormat) -> Self {
        Self {
            content,
            format,
            jwt: None,
        }
    }

    /// Parses a credential received over the wire. Proofs are not checked and
    /// `issuanceDate` is optional; everything else follows the VC data model.
    pub fn parse(raw: &Value, formats: &[VcFormat]) -> Result<Self, CredentialError> {
        let credential = match raw {
            Value::String(jwt) => {
                ensure_format(VcFormat::JwtVc, formats)?;
                Self::new(decode_jwt_claims(jwt)?, VcFormat::JwtVc)
            }
            Value::Object(content) => {
                ensure_format(VcFormat::LdpVc, formats)?;
                Self::new(content.clone(), VcFormat::LdpVc)
            }
            _ => {
                return Err(CredentialError::Malformed(
                    "credential must be a JSON object or a JWT string".to_string(),
                ));
            }
        };

        credential.validate_schema()?;
        Ok(credential)
    }

    pub fn format(&self) -> VcFormat {
        self.format
    }

    pub fn as_object(&self) -> &JsonObject {
        &self.content
    }

    pub fn jwt(&self) -> Option<&str> {
        self.jwt.as_deref()
    }

    pub fn with_jwt(mut self, jwt: String) -> Self {
        self.jwt = Some(jwt);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.content.get(key)
    }

    pub fn contexts(&self) -> Vec<String> {
        match self.content.get("@context") {
            Some(Value::String(context)) => vec![context.clone()],
            Some(Value::Array(contexts)) => contexts
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => vec![],
        }
    }

    /// Appends contexts that are not present yet, keeping existing order.
    pub fn add_contexts(&mut self, extra: &[String]) {
        let mut contexts = match self.content.remove("@context") {
            Some(Value::Array(contexts)) => contexts,
            Some(other) => vec![other],
            None => vec![],
        };
        for context in extra {
            if !contexts.iter().any(|c| c.as_str() == Some(context.as_str())) {
                contexts.push(Value::String(context.clone()));
            }
        }
        self.content
            .insert("@context".to_string(), Value::Array(contexts));
    }

    /// Replaces the issuer id, keeping issuer metadata such as `name`.
    pub fn set_issuer(&mut self, did: &str) {
        match self.content.get_mut("issuer") {
            Some(Value::Object(issuer)) => {
                issuer.insert("id".to_string(), Value::String(did.to_string()));
            }
            _ => {
                self.content
                    .insert("issuer".to_string(), Value::String(did.to_string()));
            }
        }
    }

    pub fn issuer_id(&self) -> Option<&str> {
        match self.content.get("issuer") {
            Some(Value::String(id)) => Some(id),
            Some(Value::Object(issuer)) => issuer.get("id").and_then(Value::as_str),
            _ => None,
        }
    }

    /// Adds a linked data proof. Existing proofs are kept, turning `proof`
    /// into an array when the credential already carries one.
    pub fn add_proof(&mut self, proof: Value) {
        let proof = match self.content.remove("proof") {
            None | Some(Value::Null) => proof,
            Some(Value::Array(mut proofs)) => {
                proofs.push(proof);
                Value::Array(proofs)
            }
            Some(existing) => Value::Array(vec![existing, proof]),
        };
        self.content.insert("proof".to_string(), proof);
    }

    pub fn ensure_issuance_date(&mut self, now: DateTime<Utc>) {
        self.content
            .entry("issuanceDate")
            .or_insert_with(|| json!(now.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }

    fn validate_schema(&self) -> Result<(), CredentialError> {
        let contexts = match self.content.get("@context") {
            Some(Value::String(_)) | Some(Value::Array(_)) => self.contexts(),
            _ => return Err(CredentialError::MissingField("@context")),
        };
        if contexts.first().map(String::as_str) != Some(CREDENTIALS_V1_CONTEXT) {
            return Err(CredentialError::InvalidField {
                field: "@context",
                reason: format!("first context must be {}", CREDENTIALS_V1_CONTEXT),
            });
        }

        let has_vc_type = match self.content.get("type") {
            Some(Value::String(t)) => t == VERIFIABLE_CREDENTIAL_TYPE,
            Some(Value::Array(types)) => types
                .iter()
                .any(|t| t.as_str() == Some(VERIFIABLE_CREDENTIAL_TYPE)),
            _ => return Err(CredentialError::MissingField("type")),
        };
        if !has_vc_type {
            return Err(CredentialError::InvalidField {
                field: "type",
                reason: format!("must contain {}", VERIFIABLE_CREDENTIAL_TYPE),
            });
        }

        match self.content.get("credentialSubject") {
            Some(Value::Object(_)) => {}
            Some(Value::Array(subjects)) if !subjects.is_empty() => {}
            _ => return Err(CredentialError::MissingField("credentialSubject")),
        }

        if self.issuer_id().is_none_or(str::is_empty) {
            return Err(CredentialError::MissingField("issuer"));
        }

        if let Some(id) = self.content.get("id") {
            if !id.is_string() {
                return Err(CredentialError::InvalidField {
                    field: "id",
                    reason: "must be a string".to_string(),
                });
            }
        }

        if let Some(issued) = self.content.get("issuanceDate") {
            let valid = issued
                .as_str()
                .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok());
            if !valid {
                return Err(CredentialError::InvalidField {
                    field: "issuanceDate",
                    reason: "must be an RFC 3339 date-time".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Serialize for Credential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.jwt {
            Some(jwt) => serializer.serialize_str(jwt),
            None => self.content.serialize(serializer),
        }
    }
}

fn ensure_format(format: VcFormat, allowed: &[VcFormat]) -> Result<(), CredentialError> {
    if allowed.contains(&format) {
        Ok(())
    } else {
        Err(CredentialError::UnsupportedFormat(format))
    }
}

/// Extracts the `vc` claim of a JWT credential and folds the registered
/// claims back into it. The signature segment is ignored.
fn decode_jwt_claims(jwt: &str) -> Result<JsonObject, CredentialError> {
    let segments: Vec<&str> = jwt.split('.').collect();
    if segments.len() != 3 {
        return Err(CredentialError::Malformed(
            "JWT must have three segments".to_string(),
        ));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|e| CredentialError::Malformed(format!("JWT payload is not base64url: {}", e)))?;
    let claims: JsonObject = serde_json::from_slice(&payload)
        .map_err(|e| CredentialError::Malformed(format!("JWT payload is not JSON: {}", e)))?;

    let mut vc = claims
        .get("vc")
        .and_then(Value::as_object)
        .cloned()
        .ok_or(CredentialError::MissingField("vc"))?;

    if let Some(iss) = claims.get("iss").and_then(Value::as_str) {
        vc.entry("issuer").or_insert_with(|| json!(iss));
    }
    if let Some(jti) = claims.get("jti").and_then(Value::as_str) {
        vc.entry("id").or_insert_with(|| json!(jti));
    }
    if let Some(sub) = claims.get("sub").and_then(Value::as_str) {
        if let Some(Value::Object(subject)) = vc.get_mut("credentialSubject") {
            subject.entry("id").or_insert_with(|| json!(sub));
        }
    }
    if let Some(nbf) = claims.get("nbf").and_then(epoch_to_rfc3339) {
        vc.entry("issuanceDate").or_insert_with(|| json!(nbf));
    }
    if let Some(exp) = claims.get("exp").and_then(epoch_to_rfc3339) {
        vc.entry("expirationDate").or_insert_with(|| json!(exp));
    }

    Ok(vc)
}

fn epoch_to_rfc3339(value: &Value) -> Option<String> {
    let seconds = value.as_i64()?;
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ldp_credential() -> Value {
        json!({
            "@context": [CREDENTIALS_V1_CONTEXT, "https://www.w3.org/2018/credentials/examples/v1"],
            "id": "http://example.edu/credentials/1872",
            "type": ["VerifiableCredential", "UniversityDegreeCredential"],
            "issuer": "did:example:76e12ec712ebc6f1c221ebfeb1f",
            "credentialSubject": {
                "id": "did:example:ebfeb1f712ebc6f1c276e12ec21",
                "degree": {"type": "BachelorDegree"}
            }
        })
    }

    fn jwt_for(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        format!("{header}.{payload}.")
    }

    #[test]
    fn test_parse_ldp_without_issuance_date() {
        let credential = Credential::parse(&ldp_credential(), &[VcFormat::LdpVc]).unwrap();
        assert_eq!(credential.format(), VcFormat::LdpVc);
        assert_eq!(
            credential.issuer_id(),
            Some("did:example:76e12ec712ebc6f1c221ebfeb1f")
        );
    }

    #[test]
    fn test_parse_rejects_format_not_in_profile() {
        let result = Credential::parse(&ldp_credential(), &[VcFormat::JwtVc]);
        assert_eq!(
            result,
            Err(CredentialError::UnsupportedFormat(VcFormat::LdpVc))
        );
    }

    #[test]
    fn test_parse_requires_subject() {
        let mut raw = ldp_credential();
        raw.as_object_mut().unwrap().remove("credentialSubject");
        assert_eq!(
            Credential::parse(&raw, &[VcFormat::LdpVc]),
            Err(CredentialError::MissingField("credentialSubject"))
        );
    }

    #[test]
    fn test_parse_requires_base_context_first() {
        let mut raw = ldp_credential();
        raw["@context"] = json!(["https://example.com/ctx", CREDENTIALS_V1_CONTEXT]);
        assert!(matches!(
            Credential::parse(&raw, &[VcFormat::LdpVc]),
            Err(CredentialError::InvalidField {
                field: "@context",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_issuance_date() {
        let mut raw = ldp_credential();
        raw["issuanceDate"] = json!("yesterday");
        assert!(matches!(
            Credential::parse(&raw, &[VcFormat::LdpVc]),
            Err(CredentialError::InvalidField {
                field: "issuanceDate",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_jwt_folds_registered_claims() {
        let mut vc = ldp_credential();
        vc.as_object_mut().unwrap().remove("issuer");
        vc.as_object_mut().unwrap().remove("id");
        vc["credentialSubject"]
            .as_object_mut()
            .unwrap()
            .remove("id");
        let jwt = jwt_for(json!({
            "iss": "did:example:issuer",
            "jti": "urn:uuid:1",
            "sub": "did:example:holder",
            "nbf": 1262304000,
            "vc": vc
        }));

        let credential =
            Credential::parse(&Value::String(jwt), &[VcFormat::JwtVc, VcFormat::LdpVc]).unwrap();

        assert_eq!(credential.format(), VcFormat::JwtVc);
        assert_eq!(credential.issuer_id(), Some("did:example:issuer"));
        assert_eq!(credential.get("id").unwrap(), "urn:uuid:1");
        assert_eq!(
            credential.get("credentialSubject").unwrap()["id"],
            "did:example:holder"
        );
        assert_eq!(
            credential.get("issuanceDate").unwrap(),
            "2010-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_parse_jwt_without_vc_claim() {
        let jwt = jwt_for(json!({"iss": "did:example:issuer"}));
        assert_eq!(
            Credential::parse(&Value::String(jwt), &[VcFormat::JwtVc]),
            Err(CredentialError::MissingField("vc"))
        );
    }

    #[test]
    fn test_parse_rejects_number() {
        assert!(matches!(
            Credential::parse(&json!(42), &[VcFormat::LdpVc]),
            Err(CredentialError::Malformed(_))
        ));
    }

    #[test]
    fn test_add_contexts_and_set_issuer() {
        let mut raw = ldp_credential();
        raw["issuer"] = json!({"id": "did:example:old", "name": "Old"});
        let mut credential = Credential::parse(&raw, &[VcFormat::LdpVc]).unwrap();

        credential.add_contexts(&[
            CREDENTIALS_V1_CONTEXT.to_string(),
            "https://w3id.org/vc/status-list/2021/v1".to_string(),
        ]);
        credential.set_issuer("did:key:new");

        assert_eq!(credential.contexts().len(), 3);
        assert_eq!(credential.issuer_id(), Some("did:key:new"));
        assert_eq!(credential.get("issuer").unwrap()["name"], "Old");
    }

    #[test]
    fn test_add_proof_keeps_existing_proofs() {
        let mut credential = Credential::parse(&ldp_credential(), &[VcFormat::LdpVc]).unwrap();
        credential.add_proof(json!({"proofValue": "u1"}));
        assert_eq!(credential.get("proof").unwrap(), &json!({"proofValue": "u1"}));

        credential.add_proof(json!({"proofValue": "u2"}));
        credential.add_proof(json!({"proofValue": "u3"}));
        assert_eq!(
            credential.get("proof").unwrap(),
            &json!([{"proofValue": "u1"}, {"proofValue": "u2"}, {"proofValue": "u3"}])
        );
    }

    #[test]
    fn test_serialize_prefers_jwt() {
        let credential = Credential::parse(&ldp_credential(), &[VcFormat::LdpVc])
            .unwrap()
            .with_jwt("a.b.c".to_string());
        assert_eq!(serde_json::to_value(&credential).unwrap(), json!("a.b.c"));
    }
}
