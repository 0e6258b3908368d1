//! Credential issuance.
//!
//! [`LocalCredentialIssuer`] completes a credential with the profile's issuer
//! data and signs it with a single Ed25519 key. JWT profiles receive a compact
//! JWS carrying the credential in the `vc` claim; LDP profiles receive a
//! `proof` object. LDP signing input is the key-sorted JSON serialization of
//! the credential and proof options; JSON-LD canonicalization is not applied.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, SecondsFormat, Utc};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use serde_json::{Value, json};
use std::fmt;
use tracing::debug;

use crate::domain::{
    Credential, KeyType, Profile, SignatureRepresentation, SignatureType, SigningOpts, VcFormat,
};

const ASSERTION_METHOD: &str = "assertionMethod";
const DEFAULT_KEY_FRAGMENT: &str = "key-1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuanceError {
    UnsupportedAlgorithm {
        algorithm: SignatureType,
        key_type: KeyType,
    },
    Serialization(String),
}

impl fmt::Display for IssuanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedAlgorithm {
                algorithm,
                key_type,
            } => write!(
                f,
                "signing with {} and key type {} is not available",
                algorithm, key_type
            ),
            Self::Serialization(msg) => write!(f, "credential serialization: {}", msg),
        }
    }
}

impl std::error::Error for IssuanceError {}

#[async_trait::async_trait]
pub trait IssueCredentialService: Send + Sync {
    async fn issue_credential(
        &self,
        credential: Credential,
        signing_opts: Vec<SigningOpts>,
        profile: &Profile,
    ) -> Result<Credential, IssuanceError>;
}

/// Options after defaults from the profile were applied.
struct ResolvedOpts {
    verification_method: String,
    created: DateTime<Utc>,
    challenge: Option<String>,
    domain: Option<String>,
}

impl ResolvedOpts {
    fn resolve(signing_opts: Vec<SigningOpts>, profile: &Profile, issuer: &str) -> Self {
        let mut resolved = Self {
            verification_method: profile
                .signing_did
                .as_ref()
                .map(|d| d.creator.clone())
                .unwrap_or_else(|| format!("{}#{}", issuer, DEFAULT_KEY_FRAGMENT)),
            created: Utc::now(),
            challenge: None,
            domain: None,
        };

        for opt in signing_opts {
            match opt {
                SigningOpts::VerificationMethod(vm) => resolved.verification_method = vm,
                SigningOpts::Created(created) => resolved.created = created,
                SigningOpts::Challenge(challenge) => resolved.challenge = Some(challenge),
                SigningOpts::Domain(domain) => resolved.domain = Some(domain),
            }
        }

        resolved
    }
}

pub struct LocalCredentialIssuer {
    signing_key: SigningKey,
}

impl LocalCredentialIssuer {
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    fn check_algorithm(profile: &Profile) -> Result<(), IssuanceError> {
        let vc_config = &profile.vc_config;
        let supported = matches!(
            vc_config.signing_algorithm,
            SignatureType::EdDsa
                | SignatureType::Ed25519Signature2018
                | SignatureType::Ed25519Signature2020
                | SignatureType::JsonWebSignature2020
        ) && vc_config.key_type == KeyType::Ed25519;

        if supported {
            Ok(())
        } else {
            Err(IssuanceError::UnsupportedAlgorithm {
                algorithm: vc_config.signing_algorithm,
                key_type: vc_config.key_type,
            })
        }
    }

    fn sign_jwt(
        &self,
        credential: Credential,
        issuer: &str,
        opts: &ResolvedOpts,
    ) -> Result<Credential, IssuanceError> {
        let header = json!({
            "alg": "EdDSA",
            "typ": "JWT",
            "kid": opts.verification_method,
        });

        let mut claims = serde_json::Map::new();
        claims.insert("iss".to_string(), json!(issuer));
        claims.insert("iat".to_string(), json!(opts.created.timestamp()));
        if let Some(id) = credential.get("id").and_then(Value::as_str) {
            claims.insert("jti".to_string(), json!(id));
        }
        if let Some(sub) = credential
            .get("credentialSubject")
            .and_then(|s| s.get("id"))
            .and_then(Value::as_str)
        {
            claims.insert("sub".to_string(), json!(sub));
        }
        if let Some(nbf) = rfc3339_to_epoch(credential.get("issuanceDate")) {
            claims.insert("nbf".to_string(), json!(nbf));
        }
        if let Some(exp) = rfc3339_to_epoch(credential.get("expirationDate")) {
            claims.insert("exp".to_string(), json!(exp));
        }
        if let Some(nonce) = &opts.challenge {
            claims.insert("nonce".to_string(), json!(nonce));
        }
        if let Some(aud) = &opts.domain {
            claims.insert("aud".to_string(), json!(aud));
        }
        claims.insert("vc".to_string(), Value::Object(credential.as_object().clone()));

        let signing_input = format!(
            "{}.{}",
            encode_json(&header)?,
            encode_json(&Value::Object(claims))?
        );
        let signature = self.signing_key.sign(signing_input.as_bytes());
        let jwt = format!(
            "{}.{}",
            signing_input,
            URL_SAFE_NO_PAD.encode(signature.to_bytes())
        );

        Ok(credential.with_jwt(jwt))
    }

    fn sign_ldp(
        &self,
        mut credential: Credential,
        profile: &Profile,
        opts: &ResolvedOpts,
    ) -> Result<Credential, IssuanceError> {
        let mut proof = json!({
            "type": profile.vc_config.signing_algorithm.name(),
            "created": opts.created.to_rfc3339_opts(SecondsFormat::Secs, true),
            "verificationMethod": opts.verification_method,
            "proofPurpose": ASSERTION_METHOD,
        });
        if let Some(challenge) = &opts.challenge {
            proof["challenge"] = json!(challenge);
        }
        if let Some(domain) = &opts.domain {
            proof["domain"] = json!(domain);
        }

        let document = ldp_signing_input(&credential, &proof)?;

        match profile.vc_config.signature_representation {
            SignatureRepresentation::Jws => {
                let header = encode_json(&json!({
                    "alg": "EdDSA",
                    "b64": false,
                    "crit": ["b64"],
                }))?;
                let mut input = format!("{}.", header).into_bytes();
                input.extend_from_slice(&document);
                let signature = self.signing_key.sign(&input);
                proof["jws"] = json!(format!(
                    "{}..{}",
                    header,
                    URL_SAFE_NO_PAD.encode(signature.to_bytes())
                ));
            }
            SignatureRepresentation::ProofValue => {
                let signature = self.signing_key.sign(&document);
                // multibase, base64url without padding
                proof["proofValue"] =
                    json!(format!("u{}", URL_SAFE_NO_PAD.encode(signature.to_bytes())));
            }
        }

        credential.add_proof(proof);
        Ok(credential)
    }
}

#[async_trait::async_trait]
impl IssueCredentialService for LocalCredentialIssuer {
    async fn issue_credential(
        &self,
        mut credential: Credential,
        signing_opts: Vec<SigningOpts>,
        profile: &Profile,
    ) -> Result<Credential, IssuanceError> {
        Self::check_algorithm(profile)?;

        let issuer = profile.issuer_did();
        let opts = ResolvedOpts::resolve(signing_opts, profile, &issuer);

        credential.set_issuer(&issuer);
        credential.ensure_issuance_date(opts.created);
        credential.add_contexts(&profile.vc_config.context);

        debug!(
            profile_id = %profile.id,
            format = %profile.vc_config.format,
            algorithm = %profile.vc_config.signing_algorithm,
            "Signing credential"
        );

        match profile.vc_config.format {
            VcFormat::JwtVc => self.sign_jwt(credential, &issuer, &opts),
            VcFormat::LdpVc => self.sign_ldp(credential, profile, &opts),
        }
    }
}

/// Bytes signed for an LDP proof: the credential without `proof`, next to
/// the proof options without signature values.
pub fn ldp_signing_input(credential: &Credential, proof: &Value) -> Result<Vec<u8>, IssuanceError> {
    let mut document = credential.as_object().clone();
    document.remove("proof");

    let mut options = proof.clone();
    if let Some(options) = options.as_object_mut() {
        options.remove("jws");
        options.remove("proofValue");
    }

    serde_json::to_vec(&json!({
        "document": document,
        "options": options,
    }))
    .map_err(|e| IssuanceError::Serialization(e.to_string()))
}

fn encode_json(value: &Value) -> Result<String, IssuanceError> {
    let bytes = serde_json::to_vec(value).map_err(|e| IssuanceError::Serialization(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

fn rfc3339_to_epoch(value: Option<&Value>) -> Option<i64> {
    let date = value?.as_str()?;
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|d| d.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CREDENTIALS_V1_CONTEXT, SigningDid, tests::sample_profile};
    use ed25519_dalek::{Signature, Verifier};
    use serde_json::json;

    fn issuer() -> LocalCredentialIssuer {
        LocalCredentialIssuer::from_seed(&[42u8; 32])
    }

    fn credential(format: VcFormat) -> Credential {
        let raw = json!({
            "@context": [CREDENTIALS_V1_CONTEXT],
            "id": "urn:uuid:3978344f-8596-4c3a-a978-8fcaba3903c5",
            "type": ["VerifiableCredential", "PermanentResidentCard"],
            "issuer": "did:example:placeholder",
            "credentialSubject": {"id": "did:example:holder", "givenName": "JOHN"}
        });
        Credential::new(raw.as_object().unwrap().clone(), format)
    }

    fn decode_segment(segment: &str) -> Value {
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segment).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_issue_ldp_proof_value() {
        let issuer = issuer();
        let mut profile = sample_profile("p-1", "org-1", "University");
        profile.vc_config.context = vec!["https://w3id.org/citizenship/v1".to_string()];
        let created = DateTime::parse_from_rfc3339("2022-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let signed = issuer
            .issue_credential(
                credential(VcFormat::LdpVc),
                vec![
                    SigningOpts::Created(created),
                    SigningOpts::Challenge("c-1".to_string()),
                ],
                &profile,
            )
            .await
            .unwrap();

        assert_eq!(signed.issuer_id(), Some("did:key:p-1"));
        assert_eq!(signed.get("issuanceDate").unwrap(), "2022-01-01T10:00:00Z");
        assert_eq!(signed.contexts().len(), 2);

        let proof = signed.get("proof").unwrap().clone();
        assert_eq!(proof["type"], "Ed25519Signature2018");
        assert_eq!(proof["verificationMethod"], "did:key:p-1#key-1");
        assert_eq!(proof["challenge"], "c-1");

        let proof_value = proof["proofValue"].as_str().unwrap();
        let sig_bytes = URL_SAFE_NO_PAD.decode(&proof_value[1..]).unwrap();
        let signature = Signature::from_slice(&sig_bytes).unwrap();
        let input = ldp_signing_input(&signed, &proof).unwrap();
        assert!(issuer.verifying_key().verify(&input, &signature).is_ok());
    }

    #[tokio::test]
    async fn test_issue_ldp_appends_to_existing_proof() {
        let issuer = issuer();
        let profile = sample_profile("p-1", "org-1", "University");
        let mut raw = credential(VcFormat::LdpVc).as_object().clone();
        raw.insert(
            "proof".to_string(),
            json!({"type": "Ed25519Signature2018", "proofValue": "uEXISTING"}),
        );

        let signed = issuer
            .issue_credential(Credential::new(raw, VcFormat::LdpVc), vec![], &profile)
            .await
            .unwrap();

        let proofs = signed.get("proof").unwrap().as_array().unwrap().clone();
        assert_eq!(proofs.len(), 2);
        assert_eq!(proofs[0]["proofValue"], "uEXISTING");

        let proof = &proofs[1];
        let sig_bytes = URL_SAFE_NO_PAD
            .decode(&proof["proofValue"].as_str().unwrap()[1..])
            .unwrap();
        let signature = Signature::from_slice(&sig_bytes).unwrap();
        let input = ldp_signing_input(&signed, proof).unwrap();
        assert!(issuer.verifying_key().verify(&input, &signature).is_ok());
    }

    #[tokio::test]
    async fn test_issue_ldp_detached_jws() {
        let issuer = issuer();
        let mut profile = sample_profile("p-1", "org-1", "University");
        profile.vc_config.signing_algorithm = SignatureType::JsonWebSignature2020;
        profile.vc_config.signature_representation = SignatureRepresentation::Jws;
        profile.signing_did = Some(SigningDid {
            did: "did:orb:issuer".to_string(),
            creator: "did:orb:issuer#signing".to_string(),
        });

        let signed = issuer
            .issue_credential(credential(VcFormat::LdpVc), vec![], &profile)
            .await
            .unwrap();

        let proof = signed.get("proof").unwrap().clone();
        assert_eq!(proof["verificationMethod"], "did:orb:issuer#signing");
        let jws = proof["jws"].as_str().unwrap();
        let (header, signature) = jws.split_once("..").unwrap();
        assert_eq!(decode_segment(header)["b64"], false);

        let mut input = format!("{}.", header).into_bytes();
        input.extend_from_slice(&ldp_signing_input(&signed, &proof).unwrap());
        let signature =
            Signature::from_slice(&URL_SAFE_NO_PAD.decode(signature).unwrap()).unwrap();
        assert!(issuer.verifying_key().verify(&input, &signature).is_ok());
    }

    #[tokio::test]
    async fn test_issue_jwt() {
        let issuer = issuer();
        let mut profile = sample_profile("p-1", "org-1", "University");
        profile.vc_config.format = VcFormat::JwtVc;
        profile.vc_config.signing_algorithm = SignatureType::EdDsa;

        let signed = issuer
            .issue_credential(
                credential(VcFormat::JwtVc),
                vec![SigningOpts::Domain("example.com".to_string())],
                &profile,
            )
            .await
            .unwrap();

        let jwt = signed.jwt().unwrap();
        let segments: Vec<&str> = jwt.split('.').collect();
        assert_eq!(segments.len(), 3);

        let header = decode_segment(segments[0]);
        assert_eq!(header["alg"], "EdDSA");
        let claims = decode_segment(segments[1]);
        assert_eq!(claims["iss"], "did:key:p-1");
        assert_eq!(claims["sub"], "did:example:holder");
        assert_eq!(claims["aud"], "example.com");
        assert_eq!(claims["vc"]["issuer"], "did:key:p-1");

        let signature =
            Signature::from_slice(&URL_SAFE_NO_PAD.decode(segments[2]).unwrap()).unwrap();
        let input = format!("{}.{}", segments[0], segments[1]);
        assert!(
            issuer
                .verifying_key()
                .verify(input.as_bytes(), &signature)
                .is_ok()
        );
        assert_eq!(serde_json::to_value(&signed).unwrap(), json!(jwt));
    }

    #[tokio::test]
    async fn test_unsupported_algorithm() {
        let mut profile = sample_profile("p-1", "org-1", "University");
        profile.vc_config.signing_algorithm = SignatureType::BbsBlsSignature2020;
        profile.vc_config.key_type = KeyType::Bls12381G2;

        let result = issuer()
            .issue_credential(credential(VcFormat::LdpVc), vec![], &profile)
            .await;
        assert!(matches!(
            result,
            Err(IssuanceError::UnsupportedAlgorithm { .. })
        ));
    }
}
