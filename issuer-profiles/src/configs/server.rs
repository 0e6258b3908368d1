use std::env;

use super::Configs;

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:3232";
const DEFAULT_BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_address: String,
    pub cors_allowed_origins: Vec<String>,
    pub api_prefix: String,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            cors_allowed_origins: vec![],
            api_prefix: String::new(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

#[async_trait::async_trait]
impl Configs for ServerConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let listen_address =
            env::var("LISTEN_ADDRESS").unwrap_or(DEFAULT_LISTEN_ADDRESS.to_string());

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| String::new())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let api_prefix = env::var("API_PREFIX").unwrap_or_default();

        let body_limit_bytes = match env::var("BODY_LIMIT_BYTES") {
            Ok(limit) => limit.parse::<usize>()?,
            Err(_) => DEFAULT_BODY_LIMIT_BYTES,
        };

        Ok(ServerConfig {
            listen_address,
            cors_allowed_origins,
            api_prefix,
            body_limit_bytes,
        })
    }
}
