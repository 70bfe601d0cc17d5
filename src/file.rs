//! File selection: the handle the form keeps for the user's chosen document.
//!
//! The form only ever needs a name and a byte size. A path is kept when the
//! file came from disk so a future processor can read its contents; the
//! simulated processor never touches it.

use crate::error::DocProcError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions the file picker advertises (lowercase, no dot).
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "md"];

/// Advertised maximum upload size: 10 MB.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// A selected document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl SelectedFile {
    /// Build a handle from a name and size, with no backing path.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            path: None,
        }
    }

    /// Select a file from disk, reading its size from metadata.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DocProcError> {
        let path = path.as_ref().to_path_buf();

        let meta = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DocProcError::FileNotFound { path });
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(DocProcError::PermissionDenied { path });
            }
            Err(source) => return Err(DocProcError::Io { path, source }),
        };

        if !meta.is_file() {
            return Err(DocProcError::NotAFile { path });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Selected file: {} ({} bytes)", name, meta.len());
        Ok(Self {
            name,
            size_bytes: meta.len(),
            path: Some(path),
        })
    }

    /// Size in megabytes with two decimals, e.g. `"2.00 MB"`.
    pub fn size_display(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    /// Whether the extension appears in `accepted` (case-insensitive).
    pub fn has_accepted_extension<S: AsRef<str>>(&self, accepted: &[S]) -> bool {
        match self.extension() {
            Some(ext) => accepted
                .iter()
                .any(|a| a.as_ref().trim_start_matches('.').eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }
}

/// Render an extension list as a picker `accept` attribute: `.pdf,.doc,…`.
pub fn accept_attribute<S: AsRef<str>>(extensions: &[S]) -> String {
    extensions
        .iter()
        .map(|e| format!(".{}", e.as_ref().trim_start_matches('.')))
        .collect::<Vec<_>>()
        .join(",")
}
