//! # docproc
//!
//! A document submission form as an explicit state machine: select a file,
//! enter an API key, submit it for processing, see the outcome, start over.
//!
//! ## Why a state machine?
//!
//! Forms like this usually grow a handful of independent flags (busy, done,
//! error text) that can drift into combinations no screen should show, such
//! as "processing" and "processed" at the same time. Here the submit
//! lifecycle is a single [`Phase`] value and every change goes through one
//! pure [`state::transition`] function, so impossible states cannot be
//! built and every rule is unit-testable without a runtime.
//!
//! ## Layout
//!
//! ```text
//! user event ──▶ FormController ──▶ transition(state, event)
//!                    │                    │
//!                    │◀── effects ────────┘
//!                    ├─ StartProcessing ──▶ DocumentProcessor (tokio task)
//!                    ├─ CancelProcessing ─▶ AbortHandle
//!                    └─ View(command) ────▶ FormObserver
//!
//! FormView::render(state) ──▶ labels, banners, enabled flags
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docproc::{FormConfig, FormController, SelectedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut form = FormController::simulated(FormConfig::default());
//!     form.select_file(SelectedFile::from_path("report.pdf").await?);
//!     form.edit_api_key("sk-test");
//!     form.submit().await;
//!
//!     if let Some(banner) = form.view().banner {
//!         println!("{}", banner.message());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docproc` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api_key;
pub mod config;
pub mod controller;
pub mod error;
pub mod file;
pub mod observer;
pub mod processor;
pub mod state;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use api_key::ApiKey;
pub use config::{FormConfig, FormConfigBuilder};
pub use controller::{Completion, FormController};
pub use error::{DocProcError, ProcessingError, ValidationError};
pub use file::SelectedFile;
pub use observer::{FormObserver, NoopObserver, SharedObserver};
pub use processor::{DocumentProcessor, ProcessingReceipt, SimulatedProcessor};
pub use state::{Effect, FormEvent, FormState, Phase, Ticket, ViewCommand};
pub use view::{Banner, FormView};
