pub mod config;
pub mod error;
pub mod progress;
pub mod runner;
pub mod scanner;
pub mod store;

pub use config::{PipelineConfig, SourceSpec};
pub use error::PipelineError;
pub use progress::{NoopProgress, ProgressReporter, ScanEvent};
pub use runner::{Pipeline, ScanSummary};
pub use store::RecordStore;
