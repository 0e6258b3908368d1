use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{error, warn};

const LAST_WARNING_ERROR_CODE: u16 = 499;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidValue,
    Unauthorized,
    DoesntExist,
    AlreadyExist,
    SystemError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidValue => "invalid-value",
            Self::Unauthorized => "unauthorized",
            Self::DoesntExist => "doesnt-exist",
            Self::AlreadyExist => "already-exist",
            Self::SystemError => "system-error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidValue => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::DoesntExist => StatusCode::NOT_FOUND,
            Self::AlreadyExist => StatusCode::CONFLICT,
            Self::SystemError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// REST error categories. Validation errors name the offending field, system
/// errors name the component and operation that failed.
#[derive(Debug)]
pub enum ApiError {
    Validation {
        code: ErrorCode,
        incorrect_value: String,
        internal_error: Error,
    },
    Unauthorized {
        internal_error: Error,
    },
    System {
        component: String,
        operation: String,
        internal_error: Error,
    },
}

impl ApiError {
    pub fn invalid_value(field: impl Into<String>, internal_error: impl Into<Error>) -> Self {
        Self::Validation {
            code: ErrorCode::InvalidValue,
            incorrect_value: field.into(),
            internal_error: internal_error.into(),
        }
    }

    pub fn doesnt_exist(field: impl Into<String>, internal_error: impl Into<Error>) -> Self {
        Self::Validation {
            code: ErrorCode::DoesntExist,
            incorrect_value: field.into(),
            internal_error: internal_error.into(),
        }
    }

    pub fn already_exist(field: impl Into<String>, internal_error: impl Into<Error>) -> Self {
        Self::Validation {
            code: ErrorCode::AlreadyExist,
            incorrect_value: field.into(),
            internal_error: internal_error.into(),
        }
    }

    pub fn unauthorized(internal_error: impl Into<Error>) -> Self {
        Self::Unauthorized {
            internal_error: internal_error.into(),
        }
    }

    pub fn system(
        component: impl Into<String>,
        operation: impl Into<String>,
        internal_error: impl Into<Error>,
    ) -> Self {
        Self::System {
            component: component.into(),
            operation: operation.into(),
            internal_error: internal_error.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::System { .. } => ErrorCode::SystemError,
        }
    }

    pub fn incorrect_value(&self) -> Option<&str> {
        match self {
            Self::Validation {
                incorrect_value, ..
            } => Some(incorrect_value),
            _ => None,
        }
    }

    /// `component/operation` of a system error.
    pub fn failed_call(&self) -> Option<String> {
        match self {
            Self::System {
                component,
                operation,
                ..
            } => Some(format!("{}/{}", component, operation)),
            _ => None,
        }
    }

    fn into_parts(self) -> (StatusCode, Map<String, Value>, Error) {
        let code = self.code();
        let mut payload = Map::new();
        payload.insert("code".to_string(), Value::String(code.to_string()));

        let internal_error = match self {
            Self::Validation {
                incorrect_value,
                internal_error,
                ..
            } => {
                payload.insert(
                    "incorrectValue".to_string(),
                    Value::String(incorrect_value),
                );
                internal_error
            }
            Self::Unauthorized { internal_error } => internal_error,
            Self::System {
                component,
                operation,
                internal_error,
            } => {
                payload.insert("component".to_string(), Value::String(component));
                payload.insert("operation".to_string(), Value::String(operation));
                internal_error
            }
        };
        payload.insert(
            "message".to_string(),
            Value::String(internal_error.to_string()),
        );

        (code.status(), payload, internal_error)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation {
                code,
                incorrect_value,
                internal_error,
            } => write!(f, "{}[{}]: {}", code, incorrect_value, internal_error),
            Self::Unauthorized { internal_error } => {
                write!(f, "{}: {}", ErrorCode::Unauthorized, internal_error)
            }
            Self::System {
                component,
                operation,
                internal_error,
            } => write!(
                f,
                "{}[{}, {}]: {}",
                ErrorCode::SystemError,
                component,
                operation,
                internal_error
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, payload, internal_error) = self.into_parts();
        if status.as_u16() > LAST_WARNING_ERROR_CODE {
            error!(%internal_error, "HTTP request failed with error. details: {:?}", payload);
        } else {
            warn!(%internal_error, "HTTP request failed with exception. details: {:?}", payload);
        }

        (status, Json(Value::Object(payload))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let response =
            ApiError::invalid_value("vcConfig.format", anyhow!("unsupported")).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "code": "invalid-value",
                "incorrectValue": "vcConfig.format",
                "message": "unsupported"
            })
        );
    }

    #[tokio::test]
    async fn test_system_error_response() {
        let response = ApiError::system("issuer.ProfileService", "GetProfile", anyhow!("boom"))
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "system-error");
        assert_eq!(body["component"], "issuer.ProfileService");
        assert_eq!(body["operation"], "GetProfile");
        assert!(body.get("incorrectValue").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::unauthorized(anyhow!("missing")).code().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::doesnt_exist("profile", anyhow!("gone")).code().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::already_exist("name", anyhow!("dup")).code().status(),
            StatusCode::CONFLICT
        );
    }
}
