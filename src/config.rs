//! Configuration for the document form.
//!
//! Every knob lives in [`FormConfig`], built via [`FormConfigBuilder`]. The
//! defaults reproduce the page as users know it: a two-second simulated
//! processing step, a 10 MB / five-extension hint that is displayed but not
//! enforced.

use crate::error::DocProcError;
use crate::file::{ACCEPTED_EXTENSIONS, MAX_FILE_SIZE_BYTES};
use crate::observer::FormObserver;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a [`crate::controller::FormController`].
///
/// # Example
/// ```rust
/// use docproc::FormConfig;
///
/// let config = FormConfig::builder()
///     .processing_delay_ms(500)
///     .enforce_file_limits(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.processing_delay_ms, 500);
/// ```
#[derive(Clone)]
pub struct FormConfig {
    /// Duration of the simulated processing step in milliseconds. Default: 2000.
    pub processing_delay_ms: u64,

    /// Advertised maximum file size in bytes. Default: 10 MiB.
    ///
    /// Shown in the supported-types text. Only checked on submit when
    /// `enforce_file_limits` is set.
    pub max_file_size_bytes: u64,

    /// Accepted extensions, lowercase without the dot. Default: pdf, doc, docx, txt, md.
    pub accepted_extensions: Vec<String>,

    /// Reject oversized files and unlisted extensions on submit. Default: false.
    ///
    /// Off by default: the picker filter and the size text are hints, and a
    /// file outside them is still processed.
    pub enforce_file_limits: bool,

    /// Receives transition and view-command events.
    pub observer: Option<Arc<dyn FormObserver>>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: 2000,
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            accepted_extensions: ACCEPTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            enforce_file_limits: false,
            observer: None,
        }
    }
}

impl fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig")
            .field("processing_delay_ms", &self.processing_delay_ms)
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("accepted_extensions", &self.accepted_extensions)
            .field("enforce_file_limits", &self.enforce_file_limits)
            .field("observer", &self.observer.as_ref().map(|_| "<dyn FormObserver>"))
            .finish()
    }
}

impl FormConfig {
    /// Create a new builder for `FormConfig`.
    pub fn builder() -> FormConfigBuilder {
        FormConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Max size in whole megabytes, as shown in the supported-types text.
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size_bytes / (1024 * 1024)
    }
}

/// Builder for [`FormConfig`].
#[derive(Debug)]
pub struct FormConfigBuilder {
    config: FormConfig,
}

impl FormConfigBuilder {
    pub fn processing_delay_ms(mut self, ms: u64) -> Self {
        self.config.processing_delay_ms = ms;
        self
    }

    pub fn max_file_size_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_size_bytes = bytes;
        self
    }

    pub fn accepted_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.accepted_extensions = exts
            .into_iter()
            .map(|e| e.into().trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn enforce_file_limits(mut self, v: bool) -> Self {
        self.config.enforce_file_limits = v;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn FormObserver>) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<FormConfig, DocProcError> {
        let c = &self.config;
        if c.max_file_size_bytes == 0 {
            return Err(DocProcError::InvalidConfig(
                "Max file size must be > 0".into(),
            ));
        }
        if c.accepted_extensions.is_empty() {
            return Err(DocProcError::InvalidConfig(
                "At least one accepted extension is required".into(),
            ));
        }
        if c.accepted_extensions.iter().any(|e| e.is_empty()) {
            return Err(DocProcError::InvalidConfig(
                "Accepted extensions must not be empty strings".into(),
            ));
        }
        Ok(self.config)
    }
}
