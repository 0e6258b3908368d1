use std::fs;

/// Reads a secret file. A single trailing newline is dropped.
pub fn load(path: &str) -> Result<String, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file '{}': {}", path, e))?;
    let trimmed = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
        .unwrap_or(&content);
    Ok(trimmed.to_string())
}
