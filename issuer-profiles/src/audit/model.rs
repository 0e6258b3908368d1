use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::{Profile, ProfileId};

/// Controller operations that leave an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOperation {
    CreateProfile,
    UpdateProfile,
    DeleteProfile,
    GetProfile,
    ListProfiles,
    ActivateProfile,
    DeactivateProfile,
    IssueCredential,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateProfile => "CREATE_PROFILE",
            Self::UpdateProfile => "UPDATE_PROFILE",
            Self::DeleteProfile => "DELETE_PROFILE",
            Self::GetProfile => "GET_PROFILE",
            Self::ListProfiles => "LIST_PROFILES",
            Self::ActivateProfile => "ACTIVATE_PROFILE",
            Self::DeactivateProfile => "DEACTIVATE_PROFILE",
            Self::IssueCredential => "ISSUE_CREDENTIAL",
        }
    }
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Rejected` covers requests refused on their content (4xx other than 401),
/// `Error` covers failures of a downstream component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    Success,
    Rejected,
    Unauthorized,
    Error,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "SUCCESS",
            Self::Rejected => "REJECTED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Error => "ERROR",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub operation: AuditOperation,
    pub outcome: AuditOutcome,
    #[serde(rename = "organizationID", skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(rename = "profileID", skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<ProfileId>,
    /// Activation state of the profile once the operation completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_active: Option<bool>,
    /// Error category, e.g. `invalid-value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Offending field, or `component/operation` for system errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub fn builder(operation: AuditOperation) -> AuditLogBuilder {
        AuditLogBuilder {
            operation,
            organization_id: None,
            profile_id: None,
            profile_active: None,
        }
    }
}

pub struct AuditLogBuilder {
    operation: AuditOperation,
    organization_id: Option<String>,
    profile_id: Option<ProfileId>,
    profile_active: Option<bool>,
}

impl AuditLogBuilder {
    pub fn organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn profile_id(mut self, profile_id: ProfileId) -> Self {
        self.profile_id = Some(profile_id);
        self
    }

    /// Records the id and activation state of `profile`.
    pub fn profile(mut self, profile: &Profile) -> Self {
        self.profile_id = Some(profile.id.clone());
        self.profile_active = Some(profile.active);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.profile_active = Some(active);
        self
    }

    pub fn succeeded(self) -> AuditLog {
        self.finish(AuditOutcome::Success, None, None, None)
    }

    pub fn rejected(
        self,
        error_code: impl Into<String>,
        field: Option<String>,
        message: impl Into<String>,
    ) -> AuditLog {
        self.finish(
            AuditOutcome::Rejected,
            Some(error_code.into()),
            field,
            Some(message.into()),
        )
    }

    pub fn unauthorized(self, message: impl Into<String>) -> AuditLog {
        self.finish(
            AuditOutcome::Unauthorized,
            Some("unauthorized".to_string()),
            None,
            Some(message.into()),
        )
    }

    pub fn errored(self, failed_call: Option<String>, message: impl Into<String>) -> AuditLog {
        self.finish(
            AuditOutcome::Error,
            Some("system-error".to_string()),
            failed_call,
            Some(message.into()),
        )
    }

    fn finish(
        self,
        outcome: AuditOutcome,
        error_code: Option<String>,
        error_subject: Option<String>,
        message: Option<String>,
    ) -> AuditLog {
        AuditLog {
            operation: self.operation,
            outcome,
            organization_id: self.organization_id,
            profile_id: self.profile_id,
            // state is unknown once an operation failed
            profile_active: self.profile_active.filter(|_| outcome == AuditOutcome::Success),
            error_code,
            error_subject,
            message,
            timestamp: Utc::now(),
        }
    }
}

#[async_trait::async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log(&self, audit_log: AuditLog);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tests::sample_profile;

    #[test]
    fn test_success_records_profile_state() {
        let mut profile = sample_profile("p-1", "org-1", "University");
        profile.active = false;

        let log = AuditLog::builder(AuditOperation::DeactivateProfile)
            .organization("org-1")
            .profile(&profile)
            .succeeded();

        assert_eq!(log.outcome, AuditOutcome::Success);
        assert_eq!(log.profile_id, Some(ProfileId::new("p-1")));
        assert_eq!(log.profile_active, Some(false));
        assert_eq!(log.error_code, None);
    }

    #[test]
    fn test_rejection_drops_profile_state() {
        let profile = sample_profile("p-1", "org-1", "University");

        let log = AuditLog::builder(AuditOperation::UpdateProfile)
            .organization("org-1")
            .profile(&profile)
            .rejected("already-exist", Some("name".to_string()), "name taken");

        assert_eq!(log.outcome, AuditOutcome::Rejected);
        assert_eq!(log.profile_active, None);
        assert_eq!(log.error_code.as_deref(), Some("already-exist"));
        assert_eq!(log.error_subject.as_deref(), Some("name"));
    }

    #[test]
    fn test_serialized_field_names() {
        let log = AuditLog::builder(AuditOperation::IssueCredential)
            .organization("org-1")
            .profile_id(ProfileId::new("p-1"))
            .errored(
                Some("IssueCredentialService/IssueCredential".to_string()),
                "signer down",
            );

        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value["operation"], "ISSUE_CREDENTIAL");
        assert_eq!(value["outcome"], "ERROR");
        assert_eq!(value["organizationID"], "org-1");
        assert_eq!(value["profileID"], "p-1");
        assert_eq!(value["errorSubject"], "IssueCredentialService/IssueCredential");
        assert!(value.get("profileActive").is_none());
    }
}
