pub mod issuance;
pub mod kms;
pub mod profile;

pub use issuance::{IssuanceError, IssueCredentialService, LocalCredentialIssuer};
pub use kms::{DefaultKmsRegistry, KeyManager, KmsError, KmsRegistry};
pub use profile::{ProfileService, ProfileServiceError, StoredProfileService};
