//! Observer trait for form events.
//!
//! Inject an [`Arc<dyn FormObserver>`] via
//! [`crate::config::FormConfigBuilder::observer`] to receive phase
//! transitions, submission lifecycle events and view commands as the
//! controller applies them.
//!
//! View commands are how the controller reaches UI state that lives outside
//! the form model. A file picker, for instance, keeps showing the old file
//! name until it is told to clear, so [`ViewCommand::ClearFileInput`] is
//! delivered here after a reset.
//!
//! # Example
//!
//! ```rust
//! use docproc::{FormConfig, FormObserver, ViewCommand};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct ClearCounter(AtomicUsize);
//!
//! impl FormObserver for ClearCounter {
//!     fn on_view_command(&self, command: &ViewCommand) {
//!         if *command == ViewCommand::ClearFileInput {
//!             self.0.fetch_add(1, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let config = FormConfig::builder()
//!     .observer(Arc::new(ClearCounter(AtomicUsize::new(0))) as Arc<dyn FormObserver>)
//!     .build()
//!     .unwrap();
//! ```

use crate::state::{Phase, Ticket, ViewCommand};
use std::sync::Arc;

/// Called by the controller as the form changes.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`; protect
/// shared mutable state with `Mutex` or atomics.
pub trait FormObserver: Send + Sync {
    /// Called when the form's phase changes.
    fn on_transition(&self, from: &Phase, to: &Phase) {
        let _ = (from, to);
    }

    /// Called when a submission passes validation and processing begins.
    fn on_submission_start(&self, ticket: Ticket, file_name: &str) {
        let _ = (ticket, file_name);
    }

    /// Called when a submission's completion is applied to the form.
    ///
    /// Not called for stale completions (cancelled or superseded tickets).
    fn on_submission_complete(&self, ticket: Ticket, succeeded: bool) {
        let _ = (ticket, succeeded);
    }

    /// Called for each command the view layer must carry out.
    fn on_view_command(&self, command: &ViewCommand) {
        let _ = command;
    }
}

/// A no-op implementation for callers that don't need events.
pub struct NoopObserver;

impl FormObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::FormConfig`].
pub type SharedObserver = Arc<dyn FormObserver>;
