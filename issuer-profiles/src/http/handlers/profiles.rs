use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    SharedData,
    audit::AuditOperation,
    http::{
        dto::{CreateIssuerProfileData, IssuerProfile, IssuerProfileList, UpdateIssuerProfileData},
        error::ApiError,
        extractors::OrgId,
        handlers::read_body,
    },
};

pub async fn handle_create_profile(
    State(state): State<SharedData>,
    org_id: Result<OrgId, ApiError>,
    payload: Result<Json<CreateIssuerProfileData>, JsonRejection>,
) -> Result<Json<IssuerProfile>, ApiError> {
    let body = read_body(payload)?;
    let org_id = state
        .controller
        .resolve_org_id(AuditOperation::CreateProfile, org_id)
        .await?;

    let profile = state.controller.create_profile(&org_id, body).await?;
    Ok(Json(profile))
}

pub async fn handle_list_profiles(
    State(state): State<SharedData>,
    org_id: Result<OrgId, ApiError>,
) -> Result<Json<IssuerProfileList>, ApiError> {
    let org_id = state
        .controller
        .resolve_org_id(AuditOperation::ListProfiles, org_id)
        .await?;

    Ok(Json(state.controller.list_profiles(&org_id).await?))
}

pub async fn handle_get_profile(
    State(state): State<SharedData>,
    Path(profile_id): Path<String>,
    org_id: Result<OrgId, ApiError>,
) -> Result<Json<IssuerProfile>, ApiError> {
    let org_id = state
        .controller
        .resolve_org_id(AuditOperation::GetProfile, org_id)
        .await?;

    Ok(Json(
        state.controller.get_profile(&org_id, &profile_id).await?,
    ))
}

pub async fn handle_update_profile(
    State(state): State<SharedData>,
    Path(profile_id): Path<String>,
    org_id: Result<OrgId, ApiError>,
    payload: Result<Json<UpdateIssuerProfileData>, JsonRejection>,
) -> Result<Json<IssuerProfile>, ApiError> {
    let body = read_body(payload)?;
    let org_id = state
        .controller
        .resolve_org_id(AuditOperation::UpdateProfile, org_id)
        .await?;

    let profile = state
        .controller
        .update_profile(&org_id, &profile_id, body)
        .await?;
    Ok(Json(profile))
}

pub async fn handle_delete_profile(
    State(state): State<SharedData>,
    Path(profile_id): Path<String>,
    org_id: Result<OrgId, ApiError>,
) -> Result<StatusCode, ApiError> {
    let org_id = state
        .controller
        .resolve_org_id(AuditOperation::DeleteProfile, org_id)
        .await?;

    state.controller.delete_profile(&org_id, &profile_id).await?;
    Ok(StatusCode::OK)
}

pub async fn handle_activate_profile(
    State(state): State<SharedData>,
    Path(profile_id): Path<String>,
    org_id: Result<OrgId, ApiError>,
) -> Result<StatusCode, ApiError> {
    let org_id = state
        .controller
        .resolve_org_id(AuditOperation::ActivateProfile, org_id)
        .await?;

    state
        .controller
        .activate_profile(&org_id, &profile_id)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn handle_deactivate_profile(
    State(state): State<SharedData>,
    Path(profile_id): Path<String>,
    org_id: Result<OrgId, ApiError>,
) -> Result<StatusCode, ApiError> {
    let org_id = state
        .controller
        .resolve_org_id(AuditOperation::DeactivateProfile, org_id)
        .await?;

    state
        .controller
        .deactivate_profile(&org_id, &profile_id)
        .await?;
    Ok(StatusCode::OK)
}
