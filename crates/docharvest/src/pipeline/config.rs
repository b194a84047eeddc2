use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::record::SourceType;

/// One corpus directory and the files in it that belong to a source type.
#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub source_type: SourceType,
    pub directory: PathBuf,
    pub pattern: String,
}

pub struct PipelineConfig {
    /// Scanned in this order.
    pub sources: Vec<SourceSpec>,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        let sources = SourceType::ALL
            .into_iter()
            .map(|source_type| SourceSpec {
                source_type,
                directory: config.source_directory(source_type),
                pattern: config.sources.get(source_type).pattern.clone(),
            })
            .collect();

        Self { sources }
    }

    /// Default layout (`forms/`, `emails/`, `invoices/`) under `root`.
    pub fn for_corpus<P: AsRef<Path>>(root: P) -> Self {
        let config = Config {
            corpus_directory: root.as_ref().to_string_lossy().to_string(),
            ..Config::default()
        };
        Self::from_config(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_corpus_default_layout() {
        let config = PipelineConfig::for_corpus("/data/corpus");
        let layout: Vec<(SourceType, PathBuf, &str)> = config
            .sources
            .iter()
            .map(|s| (s.source_type, s.directory.clone(), s.pattern.as_str()))
            .collect();

        assert_eq!(
            layout,
            vec![
                (SourceType::Form, PathBuf::from("/data/corpus/forms"), "*.html"),
                (SourceType::Email, PathBuf::from("/data/corpus/emails"), "*.eml"),
                (SourceType::Invoice, PathBuf::from("/data/corpus/invoices"), "*.html"),
            ]
        );
    }
}
