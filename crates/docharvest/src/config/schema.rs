use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::record::SourceType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_corpus_directory")]
    pub corpus_directory: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            corpus_directory: default_corpus_directory(),
            database_path: default_database_path(),
            sources: SourcesConfig::default(),
            classifier: ClassifierConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Directory holding the files of one source type.
    pub fn source_directory(&self, source_type: SourceType) -> PathBuf {
        Path::new(&self.corpus_directory).join(&self.sources.get(source_type).directory)
    }
}

fn default_corpus_directory() -> String {
    "dummy_data".to_string()
}

fn default_database_path() -> String {
    dirs::home_dir()
        .map(|h| h.join(".docharvest").join("data").join("docharvest.db"))
        .unwrap_or_else(|| PathBuf::from("data/docharvest.db"))
        .to_string_lossy()
        .to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_forms_source")]
    pub forms: SourceConfig,
    #[serde(default = "default_emails_source")]
    pub emails: SourceConfig,
    #[serde(default = "default_invoices_source")]
    pub invoices: SourceConfig,
}

impl SourcesConfig {
    pub fn get(&self, source_type: SourceType) -> &SourceConfig {
        match source_type {
            SourceType::Form => &self.forms,
            SourceType::Email => &self.emails,
            SourceType::Invoice => &self.invoices,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            forms: default_forms_source(),
            emails: default_emails_source(),
            invoices: default_invoices_source(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub directory: String,
    pub pattern: String,
}

impl SourceConfig {
    fn new(directory: &str, pattern: &str) -> Self {
        Self {
            directory: directory.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

fn default_forms_source() -> SourceConfig {
    SourceConfig::new("forms", "*.html")
}

fn default_emails_source() -> SourceConfig {
    SourceConfig::new("emails", "*.eml")
}

fn default_invoices_source() -> SourceConfig {
    SourceConfig::new("invoices", "*.html")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_file: Option<String>,
    #[serde(default = "default_api_key_env_var")]
    pub api_key_env_var: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env_var() -> Option<String> {
    Some("GOOGLE_API_KEY".to_string())
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: default_model(),
            endpoint: default_endpoint(),
            api_key: None,
            api_key_file: None,
            api_key_env_var: default_api_key_env_var(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
    #[serde(default = "default_true")]
    pub snapshot_on_review: bool,
    /// CSV whose header row defines the ledger columns.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default = "default_ledger")]
    pub ledger: String,
}

fn default_output_directory() -> String {
    "exports".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ledger() -> String {
    "extracted_data.csv".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            snapshot_on_review: true,
            template: None,
            ledger: default_ledger(),
        }
    }
}
