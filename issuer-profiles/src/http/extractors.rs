use anyhow::anyhow;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::fmt;

use crate::http::error::ApiError;

/// Header carrying the caller's organization, set by the authenticating proxy.
pub const ORG_ID_HEADER: &str = "X-User";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgId(pub String);

impl OrgId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for OrgId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let org_id = parts
            .headers
            .get(ORG_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::unauthorized(anyhow!("missing authorization")))?;

        Ok(OrgId(org_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::ErrorCode;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<OrgId, ApiError> {
        let (mut parts, _) = request.into_parts();
        OrgId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_org_id_from_header() {
        let request = Request::builder()
            .header(ORG_ID_HEADER, "org-1")
            .body(())
            .unwrap();

        assert_eq!(extract(request).await.unwrap(), OrgId("org-1".to_string()));
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();

        let err = extract(request).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_blank_header_is_unauthorized() {
        let request = Request::builder()
            .header(ORG_ID_HEADER, "  ")
            .body(())
            .unwrap();

        assert!(extract(request).await.is_err());
    }
}
