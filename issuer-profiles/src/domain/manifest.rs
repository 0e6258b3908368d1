use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::HashSet, fmt};

/// Credential manifest as published by an issuer (DIF Credential Manifest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialManifest {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub issuer: ManifestIssuer,
    pub output_descriptors: Vec<OutputDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation_definition: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestIssuer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    pub id: String,
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    Malformed(String),
    MissingId,
    MissingIssuerId,
    NoOutputDescriptors,
    MissingDescriptorField { index: usize, field: &'static str },
    DuplicateDescriptorId(String),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed credential manifest: {}", msg),
            Self::MissingId => write!(f, "credential manifest ID missing"),
            Self::MissingIssuerId => write!(f, "issuer ID missing"),
            Self::NoOutputDescriptors => write!(f, "no output descriptors found"),
            Self::MissingDescriptorField { index, field } => write!(
                f,
                "missing {} for output descriptor at index {}",
                field, index
            ),
            Self::DuplicateDescriptorId(id) => {
                write!(f, "the ID {} appears in multiple output descriptors", id)
            }
        }
    }
}

impl std::error::Error for ManifestError {}

impl CredentialManifest {
    pub fn decode(value: Value) -> Result<Self, ManifestError> {
        let manifest: CredentialManifest =
            serde_json::from_value(value).map_err(|e| ManifestError::Malformed(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.id.is_empty() {
            return Err(ManifestError::MissingId);
        }
        if self.issuer.id.is_empty() {
            return Err(ManifestError::MissingIssuerId);
        }
        if self.output_descriptors.is_empty() {
            return Err(ManifestError::NoOutputDescriptors);
        }

        let mut seen = HashSet::new();
        for (index, descriptor) in self.output_descriptors.iter().enumerate() {
            if descriptor.id.is_empty() {
                return Err(ManifestError::MissingDescriptorField { index, field: "ID" });
            }
            if descriptor.schema.is_empty() {
                return Err(ManifestError::MissingDescriptorField {
                    index,
                    field: "schema",
                });
            }
            if !seen.insert(descriptor.id.as_str()) {
                return Err(ManifestError::DuplicateDescriptorId(descriptor.id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest_json() -> Value {
        json!({
            "id": "university-degree",
            "version": "0.1.0",
            "issuer": {
                "id": "did:example:123",
                "name": "Example University"
            },
            "output_descriptors": [
                {
                    "id": "degree",
                    "schema": "https://schema.org/EducationalOccupationalCredential",
                    "display": {"title": {"text": "Degree"}}
                }
            ]
        })
    }

    #[test]
    fn test_decode_valid_manifest() {
        let manifest = CredentialManifest::decode(manifest_json()).unwrap();
        assert_eq!(manifest.id, "university-degree");
        assert_eq!(manifest.issuer.name.as_deref(), Some("Example University"));
        assert_eq!(manifest.output_descriptors.len(), 1);
    }

    #[test]
    fn test_decode_missing_issuer() {
        let mut value = manifest_json();
        value.as_object_mut().unwrap().remove("issuer");
        assert!(matches!(
            CredentialManifest::decode(value),
            Err(ManifestError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_empty_descriptors() {
        let mut value = manifest_json();
        value["output_descriptors"] = json!([]);
        assert_eq!(
            CredentialManifest::decode(value),
            Err(ManifestError::NoOutputDescriptors)
        );
    }

    #[test]
    fn test_decode_duplicate_descriptor_ids() {
        let mut value = manifest_json();
        value["output_descriptors"] = json!([
            {"id": "degree", "schema": "https://example.com/a"},
            {"id": "degree", "schema": "https://example.com/b"}
        ]);
        assert_eq!(
            CredentialManifest::decode(value),
            Err(ManifestError::DuplicateDescriptorId("degree".to_string()))
        );
    }

    #[test]
    fn test_decode_descriptor_without_schema() {
        let mut value = manifest_json();
        value["output_descriptors"] = json!([{"id": "degree", "schema": ""}]);
        assert_eq!(
            CredentialManifest::decode(value),
            Err(ManifestError::MissingDescriptorField {
                index: 0,
                field: "schema"
            })
        );
    }
}
