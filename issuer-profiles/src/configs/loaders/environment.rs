use std::env;

pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name).ok().filter(|v| !v.is_empty())
}

pub fn env_or(env_name: &str, default: &str) -> String {
    optional_env(env_name).unwrap_or_else(|| default.to_string())
}

/// Resolves `env://NAME` references.
pub fn load(env_name: &str) -> Result<String, String> {
    optional_env(env_name)
        .ok_or_else(|| format!("Referenced environment variable '{env_name}' is not set"))
}
