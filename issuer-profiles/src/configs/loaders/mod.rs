//! Resolves configuration values that may live outside the environment.
//!
//! Supported schemes: `string://`, `file://`, `env://`, `aws_secrets://` and
//! `aws_parameter_store://`. A value without a scheme is used as is.

pub mod aws;
pub mod environment;
pub mod file;

pub async fn load(input: &str) -> Result<String, String> {
    if let Some(content) = input.strip_prefix("string://") {
        Ok(content.to_string())
    } else if let Some(path) = input.strip_prefix("file://") {
        file::load(path)
    } else if let Some(env_name) = input.strip_prefix("env://") {
        environment::load(env_name)
    } else if let Some(secret_name) = input.strip_prefix("aws_secrets://") {
        aws::load_secret(secret_name).await
    } else if let Some(param_name) = input.strip_prefix("aws_parameter_store://") {
        aws::load_parameter(param_name).await
    } else {
        Ok(input.to_string())
    }
}
