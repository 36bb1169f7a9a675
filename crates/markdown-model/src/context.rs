//! Filesystem access for documents.
//!
//! Relative document paths are resolved against the configured project root;
//! the process working directory is never changed.

use std::path::{Path, PathBuf};

use log::debug;
use markdown_model_config::Config;
use similar::TextDiff;

use crate::document::Document;
use crate::error::{ModelError, ModelResult};
use crate::fs::{read_document, write_document};

/// Loads and saves documents using resolved configuration.
#[derive(Clone, Debug)]
pub struct DocumentContext {
    config: Config,
}

impl DocumentContext {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Context rooted at `root` with default write settings.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::new(Config::for_root(root))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.project.root
    }

    /// Absolute location of `path`: absolute paths are kept, relative ones are
    /// joined onto the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.project.root.join(path)
        }
    }

    /// Read and parse the document at `path`. The returned document keeps
    /// `path` exactly as given.
    pub fn load(&self, path: impl AsRef<Path>) -> ModelResult<Document> {
        let path = path.as_ref();
        let absolute = self.resolve(path);
        debug!("loading {}", absolute.display());
        let content = read_document(&absolute)?;
        Document::parse_str(path, &content)
    }

    /// Write the document back to its own path.
    pub fn save(&self, document: &Document) -> ModelResult<()> {
        self.save_as(document, document.path())
    }

    /// Write the document to an alternate path.
    pub fn save_as(&self, document: &Document, path: impl AsRef<Path>) -> ModelResult<()> {
        let absolute = self.resolve(path.as_ref());
        let rendered = document.to_markdown()?;
        debug!(
            "saving {} ({} sections, {} bytes)",
            absolute.display(),
            document.len(),
            rendered.len()
        );
        write_document(&absolute, &rendered, self.config.write)
    }

    /// Unified diff between what is on disk at the document's path and what
    /// `save` would write. A missing file diffs against empty content.
    pub fn preview(&self, document: &Document) -> ModelResult<Option<String>> {
        let absolute = self.resolve(document.path());
        let current = match read_document(&absolute) {
            Ok(content) => content,
            Err(ModelError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                String::new()
            }
            Err(err) => return Err(err),
        };
        let rendered = document.to_markdown()?;
        Ok(unified_diff(document.path(), &current, &rendered))
    }

    /// Parse and re-serialize the file at `path` without writing anything,
    /// returning a diff when the output would differ from the input.
    pub fn check_round_trip(&self, path: impl AsRef<Path>) -> ModelResult<Option<String>> {
        let path = path.as_ref();
        let absolute = self.resolve(path);
        let original = read_document(&absolute)?;
        let rendered = Document::parse_str(path, &original)?.to_markdown()?;
        Ok(unified_diff(path, &original, &rendered))
    }
}

/// `None` when nothing changed. Headers carry the path as the caller named it.
fn unified_diff(path: &Path, before: &str, after: &str) -> Option<String> {
    if before == after {
        return None;
    }
    let label = path.display();
    Some(
        TextDiff::from_lines(before, after)
            .unified_diff()
            .header(&format!("a/{label}"), &format!("b/{label}"))
            .to_string(),
    )
}
