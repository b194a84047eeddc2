//! Email classification collaborator.
//!
//! Classification is best-effort enrichment: callers go through
//! [`GuardedClassifier`], which bounds the call in time and maps every
//! failure to "no category".

pub mod error;
pub mod gemini;
pub mod guard;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::schema::ClassifierConfig;
use crate::secrets::{has_secret_source, resolve_secret};

pub use error::ClassifyError;
pub use gemini::GeminiClassifier;
pub use guard::GuardedClassifier;

/// The closed set of labels an email can be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailCategory {
    ClientInquiry,
    InvoiceNotification,
}

impl EmailCategory {
    pub const ALL: [EmailCategory; 2] = [
        EmailCategory::ClientInquiry,
        EmailCategory::InvoiceNotification,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ClientInquiry => "Client Inquiry",
            Self::InvoiceNotification => "Invoice Notification",
        }
    }

    /// Maps a free-form model answer to a label. Surrounding whitespace,
    /// quotes and a trailing period are tolerated; anything else is rejected.
    pub fn from_label(answer: &str) -> Option<Self> {
        let cleaned = answer
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '*')
            .trim_end_matches('.')
            .trim();

        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(cleaned))
    }
}

impl fmt::Display for EmailCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A text-categorization backend.
pub trait EmailClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<EmailCategory, ClassifyError>;
}

/// Stand-in used when no backend is available; every call is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClassifier;

impl EmailClassifier for NoopClassifier {
    fn classify(&self, _text: &str) -> Result<EmailCategory, ClassifyError> {
        Err(ClassifyError::NotConfigured)
    }
}

/// Builds the guarded classifier described by `config`.
///
/// Returns `None` when classification is disabled or cannot be set up
/// (missing API key, HTTP client failure). Parsing proceeds without
/// categories in that case.
pub fn from_config(config: &ClassifierConfig) -> Option<GuardedClassifier> {
    if !config.enabled {
        return None;
    }

    let (direct, file, env_var) = (
        config.api_key.as_deref(),
        config.api_key_file.as_deref(),
        config.api_key_env_var.as_deref(),
    );
    if !has_secret_source(direct, file, env_var) {
        warn!("Email classification disabled: no API key source configured");
        return None;
    }

    let api_key = match resolve_secret(direct, file, env_var) {
        Ok(key) => key,
        Err(e) => {
            warn!("Email classification disabled: {}", e);
            return None;
        }
    };

    let timeout = Duration::from_secs(config.timeout_secs);
    match GeminiClassifier::new(api_key, &config.model, &config.endpoint, timeout) {
        Ok(classifier) => {
            let model = classifier.model().to_string();
            let guarded = GuardedClassifier::new(Arc::new(classifier), timeout);
            info!(
                "Email classification enabled ({}, {:?} timeout)",
                model,
                guarded.timeout()
            );
            Some(guarded)
        }
        Err(e) => {
            warn!("Email classification disabled: {}", e);
            None
        }
    }
}
