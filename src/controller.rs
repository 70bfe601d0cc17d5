//! The form controller: owns a [`FormState`] and carries out its effects.
//!
//! Each accepted submit spawns one tokio task that runs the
//! [`DocumentProcessor`] inside a [`futures::future::Abortable`]. The task
//! always reports back on an mpsc channel with a [`Completion`], even when
//! the processor fails, panics or is aborted, so the form can never be left
//! stuck in `Processing`.
//!
//! Reset (or picking a new file) aborts the task. Should its completion
//! already be queued, the ticket no longer matches the form's phase and the
//! state machine drops it.
//!
//! ```rust,no_run
//! use docproc::{FormConfig, FormController, SelectedFile};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut form = FormController::simulated(FormConfig::default());
//! form.select_file(SelectedFile::new("report.pdf", 2 * 1024 * 1024));
//! form.edit_api_key("sk-test");
//! form.submit().await;
//! assert!(form.state().is_processed());
//! # }
//! ```

use crate::api_key::ApiKey;
use crate::config::FormConfig;
use crate::error::ProcessingError;
use crate::file::SelectedFile;
use crate::processor::{DocumentProcessor, ProcessingReceipt, SimulatedProcessor};
use crate::state::{transition, Effect, FormEvent, FormState, Phase, Ticket};
use crate::view::FormView;
use futures::future::{AbortHandle, Abortable, Aborted};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Outcome of one submission, delivered by its task.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub result: Result<ProcessingReceipt, ProcessingError>,
}

struct InFlight {
    ticket: Ticket,
    abort: AbortHandle,
}

/// Drives the form: user events in, effects out.
pub struct FormController {
    state: FormState,
    config: FormConfig,
    processor: Arc<dyn DocumentProcessor>,
    in_flight: Option<InFlight>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl FormController {
    pub fn new(processor: Arc<dyn DocumentProcessor>, config: FormConfig) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            state: FormState::new(),
            config,
            processor,
            in_flight: None,
            completions_tx,
            completions_rx,
        }
    }

    /// Controller backed by a [`SimulatedProcessor`] using the configured delay.
    pub fn simulated(config: FormConfig) -> Self {
        let processor = Arc::new(SimulatedProcessor::from_config(&config));
        Self::new(processor, config)
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Render the current state.
    pub fn view(&self) -> FormView {
        FormView::render(&self.state, &self.config)
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.dispatch(FormEvent::SelectFile(file));
    }

    pub fn edit_api_key(&mut self, text: impl Into<ApiKey>) {
        self.dispatch(FormEvent::EditApiKey(text.into()));
    }

    pub fn toggle_key_visibility(&mut self) {
        self.dispatch(FormEvent::ToggleKeyVisibility);
    }

    pub fn reset(&mut self) {
        self.dispatch(FormEvent::Reset);
    }

    /// Validate and, if valid, start processing without waiting for it.
    ///
    /// Returns the submission's ticket when processing started. On a
    /// validation failure the error is already on the form and `None` is
    /// returned.
    pub fn begin_submit(&mut self) -> Option<Ticket> {
        self.dispatch(FormEvent::Submit);
        self.state.in_flight()
    }

    /// Wait for the in-flight submission to finish and apply its outcome.
    ///
    /// Returns the resulting phase, or `None` immediately when nothing is in
    /// flight. Stale completions received while waiting are applied (and
    /// ignored by the state machine) without ending the wait.
    pub async fn next_completion(&mut self) -> Option<Phase> {
        let expected = self.in_flight.as_ref()?.ticket;

        while let Some(completion) = self.completions_rx.recv().await {
            let ticket = completion.ticket;
            self.dispatch(FormEvent::Completed {
                ticket,
                result: completion.result,
            });
            if ticket == expected {
                return Some(self.state.phase.clone());
            }
        }

        None
    }

    /// Submit and wait for the outcome.
    pub async fn submit(&mut self) -> &FormState {
        if self.begin_submit().is_some() {
            self.next_completion().await;
        }
        &self.state
    }

    /// Apply one event and carry out the resulting effects.
    pub fn dispatch(&mut self, event: FormEvent) {
        let completed = match &event {
            FormEvent::Completed { ticket, result } => {
                Some((*ticket, result.as_ref().err().map(|e| e.to_string())))
            }
            _ => None,
        };

        let before = std::mem::take(&mut self.state);
        let from = before.phase.clone();
        let (after, effects) = transition(before, event, &self.config);
        self.state = after;

        if from != self.state.phase {
            debug!("Form phase: {:?} -> {:?}", from, self.state.phase);
            if let Some(ref obs) = self.config.observer {
                obs.on_transition(&from, &self.state.phase);
            }
        }

        if let Some((ticket, failure)) = completed {
            if from == Phase::Processing(ticket) {
                if self.in_flight.as_ref().map(|f| f.ticket) == Some(ticket) {
                    self.in_flight = None;
                }
                let succeeded = failure.is_none();
                match failure {
                    None => info!("Submission {} processed", ticket),
                    Some(reason) => warn!("Submission {} failed: {}", ticket, reason),
                }
                if let Some(ref obs) = self.config.observer {
                    obs.on_submission_complete(ticket, succeeded);
                }
            }
        }

        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartProcessing {
                ticket,
                file,
                api_key,
            } => self.spawn_processing(ticket, file, api_key),
            Effect::CancelProcessing { ticket } => {
                if let Some(flight) = self.in_flight.take() {
                    if flight.ticket == ticket {
                        info!("Cancelling submission {}", ticket);
                        flight.abort.abort();
                    } else {
                        self.in_flight = Some(flight);
                    }
                }
                self.discard_stale_completions();
            }
            Effect::View(command) => {
                debug!("View command: {:?}", command);
                if let Some(ref obs) = self.config.observer {
                    obs.on_view_command(&command);
                }
            }
        }
    }

    /// Drop queued completions of cancelled submissions.
    ///
    /// Only called when nothing is in flight, so everything queued is stale.
    fn discard_stale_completions(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        while let Ok(completion) = self.completions_rx.try_recv() {
            debug!("Dropping stale completion for submission {}", completion.ticket);
        }
    }

    fn spawn_processing(&mut self, ticket: Ticket, file: SelectedFile, api_key: ApiKey) {
        self.discard_stale_completions();
        info!(
            "Submission {}: processing '{}' ({}) with {}",
            ticket,
            file.name,
            file.size_display(),
            self.processor.name()
        );
        if let Some(ref obs) = self.config.observer {
            obs.on_submission_start(ticket, &file.name);
        }

        let (abort, registration) = AbortHandle::new_pair();
        let processor = Arc::clone(&self.processor);
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let work = tokio::spawn(Abortable::new(
                async move { processor.process(&file, &api_key).await },
                registration,
            ));
            let result = match work.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(Aborted)) => Err(ProcessingError::Cancelled),
                Err(join_err) => Err(ProcessingError::Failed {
                    reason: format!("processing task ended abnormally: {join_err}"),
                }),
            };
            // The receiver lives as long as the controller.
            let _ = tx.send(Completion { ticket, result });
        });

        self.in_flight = Some(InFlight { ticket, abort });
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            flight.abort.abort();
        }
    }
}
