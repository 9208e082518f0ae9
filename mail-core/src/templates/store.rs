//! File-backed template store
//!
//! Templates live as `<name>.txt` files in a single directory that is treated
//! as read-only at runtime.

use crate::error::{MailError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension of template files
pub const TEMPLATE_EXTENSION: &str = "txt";

/// Resolves template names to files inside the template directory
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// A name is valid when it is non-empty and only contains ASCII
    /// alphanumerics, `_` or `-`. This rules out separators and `..`.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    /// Map a template name to its file path
    ///
    /// Invalid names are rejected before any filesystem access.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf> {
        if !Self::is_valid_name(name) {
            warn!("Rejected template name: {:?}", name);
            return Err(MailError::InvalidTemplateName(name.to_string()));
        }

        let path = self.dir.join(format!("{}.{}", name, TEMPLATE_EXTENSION));

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(MailError::TemplateNotFound(name.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MailError::TemplateNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read the raw text of a template
    pub async fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name).await?;
        debug!("Loading template {} from {}", name, path.display());
        Ok(tokio::fs::read_to_string(&path).await?)
    }

    /// Names of all templates, sorted lexicographically
    ///
    /// A missing directory yields an empty list.
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Template directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if Self::is_valid_name(stem) {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}
