//! API key resolution.
//!
//! A key can be given inline, as a file to read (Docker/Kubernetes secret
//! mounts) or as the name of an environment variable. The first non-empty
//! source wins, in that order.

use std::fs;
use std::path::PathBuf;

use secrecy::SecretString;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No API key source configured (set api_key, api_key_file or api_key_env_var)")]
    NoSourceProvided,

    #[error("Failed to read API key file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("API key file '{path}' is empty")]
    EmptyFile { path: String },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// Resolves a secret from the first configured source.
///
/// ```ignore
/// use docharvest::secrets::resolve_secret;
///
/// let key = resolve_secret(None, Some("~/.config/gemini.key"), Some("GOOGLE_API_KEY"))?;
/// ```
pub fn resolve_secret(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> Result<SecretString> {
    if let Some(value) = non_empty(direct) {
        return Ok(SecretString::from(value.to_string()));
    }

    if let Some(path) = non_empty(file_path) {
        return read_secret_file(path);
    }

    if let Some(name) = non_empty(env_var) {
        return match std::env::var(name) {
            Ok(value) => Ok(SecretString::from(value.trim().to_string())),
            Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                name: name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                name: name.to_string(),
            }),
        };
    }

    Err(SecretError::NoSourceProvided)
}

/// True when at least one source is configured, whether or not it resolves.
pub fn has_secret_source(
    direct: Option<&str>,
    file_path: Option<&str>,
    env_var: Option<&str>,
) -> bool {
    non_empty(direct).is_some() || non_empty(file_path).is_some() || non_empty(env_var).is_some()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn read_secret_file(path: &str) -> Result<SecretString> {
    let expanded = expand_home(path);
    let display = expanded.to_string_lossy().into_owned();

    let content = fs::read_to_string(&expanded).map_err(|e| SecretError::FileReadError {
        path: display.clone(),
        source: e,
    })?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SecretError::EmptyFile { path: display });
    }

    Ok(SecretString::from(trimmed.to_string()))
}

/// Expands a leading `~` to the home directory. `~user` is not supported.
fn expand_home(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}
