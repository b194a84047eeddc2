use std::path::Path;

use log::info;

use crate::config::schema::Config;
use crate::error::ConfigError;
use crate::record::SourceType;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

/// Loads `path` when it exists, otherwise falls back to the built-in
/// defaults.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        info!(
            "No config file at {}, using built-in defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    load_config(path)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    for source_type in SourceType::ALL {
        let source = config.sources.get(source_type);
        if let Err(e) = glob::Pattern::new(&source.pattern) {
            return Err(ConfigError::InvalidPattern {
                source_name: source_type.to_string(),
                reason: e.to_string(),
            });
        }
    }

    if config.classifier.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "classifier.timeout_secs must be greater than zero".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let config = load_config_from_str(r#"{ "version": "1.0" }"#).unwrap();

        assert_eq!(config.corpus_directory, "dummy_data");
        assert_eq!(config.sources.forms.pattern, "*.html");
        assert_eq!(config.sources.emails.pattern, "*.eml");
        assert_eq!(config.sources.invoices.directory, "invoices");
        assert!(!config.classifier.enabled);
        assert_eq!(config.classifier.model, "gemini-2.5-flash-lite");
        assert_eq!(
            config.classifier.api_key_env_var.as_deref(),
            Some("GOOGLE_API_KEY")
        );
        assert_eq!(config.classifier.timeout_secs, 10);
        assert!(config.export.snapshot_on_review);
        assert_eq!(config.export.ledger, "extracted_data.csv");
    }

    #[test]
    fn test_load_full_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "corpus_directory": "/srv/corpus",
            "database_path": "/var/lib/docharvest/records.db",
            "sources": {
                "forms": { "directory": "web-forms", "pattern": "*.htm*" },
                "emails": { "directory": "mail", "pattern": "*.txt" },
                "invoices": { "directory": "billing", "pattern": "INV-*.html" }
            },
            "classifier": {
                "enabled": true,
                "model": "gemini-2.5-flash",
                "api_key_env_var": "MY_KEY",
                "timeout_secs": 3
            },
            "export": {
                "output_directory": "/srv/exports",
                "snapshot_on_review": false,
                "template": "templates/ledger.csv",
                "ledger": "/srv/exports/ledger.csv"
            }
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();

        assert_eq!(config.database_path, "/var/lib/docharvest/records.db");
        assert_eq!(
            config.source_directory(SourceType::Email),
            PathBuf::from("/srv/corpus/mail")
        );
        assert_eq!(config.sources.invoices.pattern, "INV-*.html");
        assert!(config.classifier.enabled);
        assert_eq!(config.classifier.timeout_secs, 3);
        assert_eq!(
            config.export.template.as_deref(),
            Some("templates/ledger.csv")
        );
        assert!(!config.export.snapshot_on_review);
    }

    #[test]
    fn test_invalid_version() {
        let result = load_config_from_str(r#"{ "version": "2.0" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_field_rejected_by_schema() {
        let result = load_config_from_str(r#"{ "version": "1.0", "worker_count": 4 }"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = load_config_from_str(
            r#"{ "version": "1.0", "classifier": { "timeout_secs": 0 } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = load_config_from_str(
            r#"{ "version": "1.0", "sources": { "forms": { "directory": "forms", "pattern": "[*.html" } } }"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(dir.path().join("docharvest.json")).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.corpus_directory, "dummy_data");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docharvest.json");
        std::fs::write(&path, r#"{ "version": "1.0", "corpus_directory": "corpus" }"#).unwrap();

        let config = load_config_or_default(&path).unwrap();
        assert_eq!(config.corpus_directory, "corpus");
    }

    #[test]
    fn test_unreadable_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
