use std::sync::Arc;

use axum::{Json, Router, routing::get};
use dotenvy::dotenv;
use serde_json::json;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    SharedData,
    audit::BaseAuditLogger,
    configs::{AuditConfig, Configs, IssuerConfig, IssuerProfilesConfig, ServerConfig},
    http::{Controller, ControllerConfig, application_routes},
    service::{DefaultKmsRegistry, LocalCredentialIssuer, StoredProfileService},
    storage::{factory::StorageRepoFactory, profile_store::ProfileStore, repository::KeyValueStore},
};

fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // reads RUST_LOG
        .with_target(false)
        .with_level(true)
        .with_thread_ids(true)
        .try_init();
}

/// Wires the profile service, KMS registry, issuer and audit trail over `store`.
pub fn build_controller(
    store: Arc<dyn KeyValueStore>,
    issuer_config: &IssuerConfig,
    audit_config: AuditConfig,
) -> Arc<Controller> {
    let profile_svc = StoredProfileService::new(ProfileStore::new(store));
    let issuer = LocalCredentialIssuer::from_seed(&issuer_config.signing_key_seed);

    Arc::new(Controller::new(ControllerConfig {
        profile_svc: Arc::new(profile_svc),
        kms_registry: Arc::new(DefaultKmsRegistry::default()),
        issue_credential_service: Arc::new(issuer),
        audit_logger: Arc::new(BaseAuditLogger::new(audit_config)),
    }))
}

pub fn build_router(config: &ServerConfig, shared_data: SharedData) -> Router {
    let cors = build_cors_layer(&config.cors_allowed_origins);

    let health_route =
        Router::new().route("/health", get(|| async { Json(json!({ "status": "OK" })) }));

    health_route
        .merge(application_routes(&config.api_prefix, shared_data))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(cors)
}

async fn start_http_server(
    config: Arc<IssuerProfilesConfig>,
    store: Arc<dyn KeyValueStore>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listen_address = config.server_config.listen_address.clone();

    let controller = build_controller(
        store,
        &config.issuer_config,
        config.audit_config.clone(),
    );
    let shared_data = SharedData::new(config.server_config.clone(), controller);
    let main_router = build_router(&config.server_config, shared_data);

    info!("HTTP server is starting on {}...", listen_address);
    debug!("CONFIGS: {:?}", &config);

    let listener = tokio::net::TcpListener::bind(&listen_address).await?;
    axum::serve(listener, main_router).await?;

    Ok(())
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        info!("CORS: No allowed origins configured, allowing all origins");
        return CorsLayer::permissive();
    }

    if allowed_origins.len() == 1 && allowed_origins[0] == "*" {
        info!("CORS: Wildcard configured, allowing all origins");
        return CorsLayer::permissive();
    }

    info!("CORS: Configured allowed origins: {:?}", allowed_origins);

    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

pub async fn start() {
    // resources section
    dotenv().ok();

    setup_logging();

    let config = match IssuerProfilesConfig::load().await {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!(
                "Failed to load configs. End of work. Cause: {}",
                e
            );
            panic!("Failed to load configs");
        }
    };

    if config.issuer_config.is_ephemeral_key {
        warn!("Issued credentials will not verify after a restart.");
    }

    let repository_factory = StorageRepoFactory::new(Arc::clone(&config));

    let store = match repository_factory.create().await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize profile storage: {}", e);
            panic!("Failed to initialize profile storage: {}", e);
        }
    };

    // tasks section
    let http_task = tokio::spawn(start_http_server(config, store));

    match http_task.await {
        Ok(Ok(())) => warn!("http_task stopped"),
        Ok(Err(e)) => error!("http_task failed: {:?}", e),
        Err(e) => error!("http_task failed: {:?}", e),
    }

    std::process::exit(1);
}
