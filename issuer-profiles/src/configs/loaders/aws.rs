use aws_config::{self, BehaviorVersion};

pub async fn load_secret(secret_name: &str) -> Result<String, String> {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = aws_sdk_secretsmanager::Client::new(&config);

    let result = client
        .get_secret_value()
        .secret_id(secret_name)
        .send()
        .await
        .map_err(|e| format!("Failed to get secret '{secret_name}': {e}"))?;

    result
        .secret_string()
        .map(|s| s.to_string())
        .ok_or_else(|| format!("Secret '{secret_name}' has no string value"))
}

pub async fn load_parameter(param_name: &str) -> Result<String, String> {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let client = aws_sdk_ssm::Client::new(&config);

    let result = client
        .get_parameter()
        .name(param_name)
        .with_decryption(true)
        .send()
        .await
        .map_err(|e| format!("Failed to get parameter '{param_name}': {e}"))?;

    result
        .parameter()
        .and_then(|p| p.value())
        .map(|v| v.to_string())
        .ok_or_else(|| format!("Parameter '{param_name}' has no value"))
}
