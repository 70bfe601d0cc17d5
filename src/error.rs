//! Error types for the docproc library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`ValidationError`] — a submit precondition failed (no file, blank API
//!   key, or an enforced file limit). Detected synchronously before any
//!   processing starts. Its `Display` text is exactly what the form shows in
//!   its error banner.
//!
//! * [`ProcessingError`] — the processing operation itself failed or was
//!   cancelled. The form always shows the generic retry message for a
//!   failure, whatever the underlying reason.
//!
//! * [`DocProcError`] — **Fatal** for the calling operation, but never for
//!   the form: selecting a file that does not exist, an invalid
//!   configuration, and similar plumbing failures outside the state machine.

use std::path::PathBuf;
use thiserror::Error;

/// Banner text shown when the processing operation fails.
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process document. Please try again.";

/// A submit precondition that was not met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Submit pressed with no file selected.
    #[error("Please select a file to process")]
    FileRequired,

    /// Submit pressed with empty or whitespace-only API key text.
    #[error("Please enter your API key")]
    ApiKeyRequired,

    /// File exceeds the advertised size limit (only when limits are enforced).
    #[error("File \"{name}\" is too large ({size_bytes} bytes, max {max_bytes} bytes)")]
    FileTooLarge {
        name: String,
        size_bytes: u64,
        max_bytes: u64,
    },

    /// File extension is not in the accepted list (only when limits are enforced).
    #[error("File \"{name}\" is not a supported type (PDF, DOC, DOCX, TXT, MD)")]
    UnsupportedFileType { name: String },
}

/// Failure of the processing operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// The processor reported a failure.
    #[error("Processing failed: {reason}")]
    Failed { reason: String },

    /// The operation was aborted before it completed (reset or re-selection).
    #[error("Processing was cancelled")]
    Cancelled,
}

impl ProcessingError {
    /// Text shown in the form's error banner for this failure.
    pub fn banner_message(&self) -> &'static str {
        PROCESSING_FAILED_MESSAGE
    }
}

/// Errors raised outside the form state machine.
#[derive(Debug, Error)]
pub enum DocProcError {
    // ── File selection ────────────────────────────────────────────────────
    /// Selected path does not exist.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Path exists but is a directory or other non-regular file.
    #[error("'{path}' is not a regular file")]
    NotAFile { path: PathBuf },

    /// Could not read metadata for the selected file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
