use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::{
    audit::model::{AuditLog, AuditLogger, AuditOutcome},
    configs::{AuditConfig, AuditLogFormat},
};

/// Writes audit records through `tracing`: successes at `info`, refused
/// requests at `warn` and system errors at `error`.
#[derive(Clone)]
pub struct BaseAuditLogger {
    config: AuditConfig,
}

impl BaseAuditLogger {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    fn render(&self, audit_log: &AuditLog) -> String {
        match self.config.log_format {
            AuditLogFormat::Json => render_json(audit_log).to_string(),
            AuditLogFormat::Text => render_text(audit_log),
        }
    }
}

fn render_json(audit_log: &AuditLog) -> Value {
    serde_json::to_value(audit_log).unwrap_or_else(|e| {
        json!({
            "operation": audit_log.operation.as_str(),
            "outcome": audit_log.outcome.to_string(),
            "message": format!("audit record not serializable: {}", e),
        })
    })
}

/// `ISSUE_CREDENTIAL ERROR org=org-1 profile=p-1 code=system-error ...`
fn render_text(audit_log: &AuditLog) -> String {
    let mut line = format!("{} {}", audit_log.operation, audit_log.outcome);

    let fields = [
        ("org", audit_log.organization_id.clone()),
        ("profile", audit_log.profile_id.as_ref().map(|id| id.to_string())),
        ("active", audit_log.profile_active.map(|a| a.to_string())),
        ("code", audit_log.error_code.clone()),
        ("subject", audit_log.error_subject.clone()),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            line.push_str(&format!(" {}={}", key, value));
        }
    }
    line.push_str(&format!(" at={}", audit_log.timestamp.to_rfc3339()));

    if let Some(message) = &audit_log.message {
        line.push_str(&format!(" | {}", message));
    }
    line
}

#[async_trait::async_trait]
impl AuditLogger for BaseAuditLogger {
    async fn log(&self, audit_log: AuditLog) {
        let record = self.render(&audit_log);
        match audit_log.outcome {
            AuditOutcome::Success => info!(target: "audit", "{}", record),
            AuditOutcome::Rejected | AuditOutcome::Unauthorized => {
                warn!(target: "audit", "{}", record)
            }
            AuditOutcome::Error => error!(target: "audit", "{}", record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::model::AuditOperation;
    use crate::domain::ProfileId;

    fn logger(log_format: AuditLogFormat) -> BaseAuditLogger {
        BaseAuditLogger::new(AuditConfig { log_format })
    }

    #[test]
    fn test_text_success() {
        let log = AuditLog::builder(AuditOperation::ActivateProfile)
            .organization("org-1")
            .profile_id(ProfileId::new("p-1"))
            .active(true)
            .succeeded();

        let line = logger(AuditLogFormat::Text).render(&log);

        assert!(line.starts_with("ACTIVATE_PROFILE SUCCESS org=org-1 profile=p-1 active=true at="));
        assert!(!line.contains('|'));
    }

    #[test]
    fn test_text_rejection_carries_field_and_message() {
        let log = AuditLog::builder(AuditOperation::CreateProfile)
            .organization("org-1")
            .rejected("invalid-value", Some("vcConfig.format".to_string()), "bad format");

        let line = logger(AuditLogFormat::Text).render(&log);

        assert!(line.starts_with(
            "CREATE_PROFILE REJECTED org=org-1 code=invalid-value subject=vcConfig.format"
        ));
        assert!(line.ends_with("| bad format"));
    }

    #[test]
    fn test_json_unauthorized() {
        let log = AuditLog::builder(AuditOperation::ListProfiles).unauthorized("missing authorization");

        let value: Value =
            serde_json::from_str(&logger(AuditLogFormat::Json).render(&log)).unwrap();

        assert_eq!(value["operation"], "LIST_PROFILES");
        assert_eq!(value["outcome"], "UNAUTHORIZED");
        assert_eq!(value["errorCode"], "unauthorized");
        assert!(value.get("organizationID").is_none());
    }

    #[tokio::test]
    async fn test_log_through_trait() {
        logger(AuditLogFormat::Json)
            .log(
                AuditLog::builder(AuditOperation::DeleteProfile)
                    .organization("org-1")
                    .errored(None, "store down"),
            )
            .await;
    }
}
