use serde_derive::{Deserialize, Serialize};
use std::fmt;

use super::{Configs, loaders::environment::env_or};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditLogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for AuditLogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for AuditLogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid audit log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditConfig {
    pub log_format: AuditLogFormat,
}

#[async_trait::async_trait]
impl Configs for AuditConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let log_format = env_or("AUDIT_LOG_FORMAT", "text")
            .parse::<AuditLogFormat>()
            .unwrap_or(AuditLogFormat::Text);

        Ok(AuditConfig { log_format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_log_format_from_str() {
        assert_eq!("JSON".parse::<AuditLogFormat>().unwrap(), AuditLogFormat::Json);
        assert_eq!("text".parse::<AuditLogFormat>().unwrap(), AuditLogFormat::Text);
        assert!("xml".parse::<AuditLogFormat>().is_err());
    }
}
