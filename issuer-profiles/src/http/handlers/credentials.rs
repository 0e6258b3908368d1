use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    SharedData,
    audit::AuditOperation,
    domain::Credential,
    http::{dto::IssueCredentialData, error::ApiError, extractors::OrgId, handlers::read_body},
};

/// Responds with the signed credential: a JSON object for LDP profiles, a
/// JWT string for JWT profiles.
pub async fn handle_issue_credential(
    State(state): State<SharedData>,
    Path(profile_id): Path<String>,
    org_id: Result<OrgId, ApiError>,
    payload: Result<Json<IssueCredentialData>, JsonRejection>,
) -> Result<Json<Credential>, ApiError> {
    let body = read_body(payload)?;
    let org_id = state
        .controller
        .resolve_org_id(AuditOperation::IssueCredential, org_id)
        .await?;

    let credential = state
        .controller
        .issue_credential(&org_id, &profile_id, body)
        .await?;
    Ok(Json(credential))
}
