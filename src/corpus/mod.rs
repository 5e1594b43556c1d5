//! Corpus store: a directory of reference documents.
//!
//! The directory is listed fresh on every check. Only regular files with the
//! configured extension (case-insensitive) are eligible; documents are returned
//! sorted by filename so the traversal order, and with it tie-breaking in the
//! ranking, is deterministic. Document bytes are read lazily.

mod error;


pub use error::CorpusError;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;

/// One eligible reference document, identified by its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    name: String,
    path: PathBuf,
}

impl CorpusDocument {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Filename within the corpus directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw bytes. Called once per scan, right before extraction.
    pub async fn load_bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Read-only view over the corpus directory.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    dir: PathBuf,
    extension: String,
}

impl CorpusStore {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_ascii_lowercase(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.corpus_dir.clone(), &config.corpus_extension)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// `true` if `path` has the eligible extension.
    pub fn is_eligible(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }

    /// Lists eligible documents, sorted by filename.
    ///
    /// A missing or unreadable directory is an error; an empty one is not.
    pub async fn list_documents(&self) -> Result<Vec<CorpusDocument>, CorpusError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| CorpusError::from_io(&self.dir, e))?;

        let mut documents = Vec::new();
        let mut ignored = 0usize;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CorpusError::from_io(&self.dir, e))?
        {
            let path = entry.path();

            // Follows symlinks; a dangling link is skipped like any other non-file.
            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);

            if !is_file || !self.is_eligible(&path) {
                ignored += 1;
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            documents.push(CorpusDocument::new(name, path));
        }

        documents.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(
            dir = %self.dir.display(),
            eligible = documents.len(),
            ignored,
            "Corpus listed"
        );

        Ok(documents)
    }
}
