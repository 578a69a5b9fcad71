use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use headline_core::error::{HeadlineError, Result};
use headline_core::Document;

/// Anything that yields a batch of fetched documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<Document>>;
}

/// Reads a JSON array of documents from disk.
///
/// Documents with a missing or empty `source` take the source's own name.
pub struct JsonFileSource {
    name: String,
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Source named after the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }
}

#[async_trait]
impl DocumentSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Document>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            HeadlineError::Fetch(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let mut documents: Vec<Document> = serde_json::from_str(&content)?;
        for doc in &mut documents {
            if doc.source.is_empty() {
                doc.source = self.name.clone();
            }
        }
        debug!(source = %self.name, count = documents.len(), "Documents loaded");
        Ok(documents)
    }
}
