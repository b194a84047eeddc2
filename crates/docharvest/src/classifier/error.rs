//! Classification error types.

use thiserror::Error;

/// Errors a classification backend can report. None of them reach the
/// stored data; the guard turns each into "no category".
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Classifier is not configured")]
    NotConfigured,

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Classification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Classifier returned no candidates")]
    EmptyResponse,

    #[error("Classifier returned an unrecognized label: '{0}'")]
    UnrecognizedLabel(String),
}
