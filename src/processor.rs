//! The processing capability.
//!
//! The form never talks to a backend directly. It hands the selected file
//! and API key to a [`DocumentProcessor`] and waits for one outcome, so a
//! networked implementation can replace [`SimulatedProcessor`] without the
//! state machine changing.

use crate::api_key::ApiKey;
use crate::config::FormConfig;
use crate::error::ProcessingError;
use crate::file::SelectedFile;
use async_trait::async_trait;
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Result of a successful processing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingReceipt {
    pub file_name: String,
    pub size_bytes: u64,
    pub processor: String,
    pub elapsed_ms: u64,
}

/// Submits a document for processing.
///
/// Implementations must be cancellation-safe: the controller drops the
/// future when the form is reset mid-flight.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    /// Short identifier used in logs and receipts.
    fn name(&self) -> &str;

    async fn process(
        &self,
        file: &SelectedFile,
        api_key: &ApiKey,
    ) -> Result<ProcessingReceipt, ProcessingError>;
}

/// Stand-in processor: waits a fixed delay, touches nothing.
#[derive(Debug, Clone)]
pub struct SimulatedProcessor {
    delay: Duration,
    failure: Option<String>,
}

impl SimulatedProcessor {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    /// Uses the configured processing delay.
    pub fn from_config(config: &FormConfig) -> Self {
        Self::new(config.processing_delay())
    }

    /// Waits the delay, then fails with `reason`.
    pub fn failing(delay: Duration, reason: impl Into<String>) -> Self {
        Self {
            delay,
            failure: Some(reason.into()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedProcessor {
    fn default() -> Self {
        Self::from_config(&FormConfig::default())
    }
}

#[async_trait]
impl DocumentProcessor for SimulatedProcessor {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn process(
        &self,
        file: &SelectedFile,
        _api_key: &ApiKey,
    ) -> Result<ProcessingReceipt, ProcessingError> {
        let start = Instant::now();
        debug!("Simulating processing of '{}' for {:?}", file.name, self.delay);
        sleep(self.delay).await;

        if let Some(ref reason) = self.failure {
            warn!("Simulated failure for '{}': {}", file.name, reason);
            return Err(ProcessingError::Failed {
                reason: reason.clone(),
            });
        }

        Ok(ProcessingReceipt {
            file_name: file.name.clone(),
            size_bytes: file.size_bytes,
            processor: self.name().to_string(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}
