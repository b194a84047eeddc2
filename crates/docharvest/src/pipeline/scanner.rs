use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, warn};
use walkdir::WalkDir;

use super::error::PipelineError;

/// Lists the regular files directly inside `directory` whose name matches
/// `pattern`, sorted by file name. Symlinks are followed; entries that cannot
/// be read are logged and left out.
pub fn list_source_files(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>, PipelineError> {
    if !directory.is_dir() {
        return Err(PipelineError::MissingDirectory(directory.to_path_buf()));
    }

    let pattern = Pattern::new(pattern).map_err(|e| PipelineError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let err = PipelineError::Scan {
                    path: directory.to_path_buf(),
                    source: e,
                };
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .file_name()
            .to_str()
            .map(|name| pattern.matches(name))
            .unwrap_or(false);
        if matches {
            debug!("Found source file: {}", entry.path().display());
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
