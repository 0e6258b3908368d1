use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
};
use ed25519_dalek::SigningKey;
use issuer_profiles::configs::issuer::generate_signing_key_seed;
use std::{
    collections::BTreeMap,
    env,
    fs::{self, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::Path,
};

const SIGNING_KEY_ENV: &str = "ISSUER_SIGNING_KEY";

/// Sets `new_vars` in the env file at `file_path`, keeping comments, blank
/// lines and the order of existing entries. A missing file starts from the
/// example file when one exists.
fn insert_env_vars(
    file_path: &str,
    mut new_vars: BTreeMap<String, String>,
    example_file_path: Option<&str>,
) -> std::io::Result<()> {
    let path = Path::new(file_path);

    if !path.exists()
        && let Some(example_path) = example_file_path
    {
        let example = Path::new(example_path);
        if example.exists() {
            fs::copy(example, path)?;
        }
    }

    let mut lines = Vec::new();
    if path.exists() {
        let reader = BufReader::new(fs::File::open(path)?);
        for line in reader.lines() {
            let line = line?;
            let key = env_key(&line);
            match key.and_then(|key| new_vars.remove_entry(key)) {
                Some((key, value)) => lines.push(format!("{}={}", key, value)),
                None => lines.push(line),
            }
        }
    }

    lines.extend(
        new_vars
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value)),
    );

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    for line in lines {
        writeln!(file, "{}", line)?;
    }

    Ok(())
}

fn env_key(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        return None;
    }
    trimmed.split_once('=').map(|(key, _)| key.trim())
}

/// Generates the local issuer's Ed25519 seed and stores it in an env file.
///
/// Usage: `generate-signing-key [ENV_FILE]` (defaults to `.env`).
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_file = env::args().nth(1).unwrap_or_else(|| ".env".to_string());

    let seed = generate_signing_key_seed();
    let verifying_key = SigningKey::from_bytes(&seed).verifying_key();

    let mut vars = BTreeMap::new();
    vars.insert(
        SIGNING_KEY_ENV.to_string(),
        format!("string://{}", STANDARD.encode(seed)),
    );
    insert_env_vars(&env_file, vars, Some(".env.example"))?;

    println!("{} written to {}", SIGNING_KEY_ENV, env_file);
    println!(
        "Public key (base64url): {}",
        URL_SAFE_NO_PAD.encode(verifying_key.as_bytes())
    );

    Ok(())
}
