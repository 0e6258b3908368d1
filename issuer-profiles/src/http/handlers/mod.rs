use crate::SharedData;
use crate::http::error::ApiError;
use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{get, post},
};

pub mod credentials;
pub mod profiles;

const REQUEST_BODY: &str = "requestBody";

pub(crate) fn read_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::invalid_value(REQUEST_BODY, e))
}

pub fn application_routes(api_prefix: &str, shared_data: SharedData) -> Router {
    let all_handlers = Router::new()
        .route(
            "/issuer/profiles",
            post(profiles::handle_create_profile).get(profiles::handle_list_profiles),
        )
        .route(
            "/issuer/profiles/{profileID}",
            get(profiles::handle_get_profile)
                .put(profiles::handle_update_profile)
                .delete(profiles::handle_delete_profile),
        )
        .route(
            "/issuer/profiles/{profileID}/activate",
            post(profiles::handle_activate_profile),
        )
        .route(
            "/issuer/profiles/{profileID}/deactivate",
            post(profiles::handle_deactivate_profile),
        )
        .route(
            "/issuer/profiles/{profileID}/credentials/issue",
            post(credentials::handle_issue_credential),
        );

    let router = if api_prefix.is_empty() || api_prefix == "/" {
        Router::new().merge(all_handlers)
    } else {
        Router::new().nest(api_prefix, all_handlers)
    };
    router.with_state(shared_data)
}
