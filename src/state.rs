//! The form state machine.
//!
//! [`FormState`] holds everything the page shows. The busy/done/error flags
//! are a single [`Phase`] value, so "processing and processed at once" or
//! "processed with an error" cannot be represented.
//!
//! [`transition`] is pure: it takes the current state and one [`FormEvent`]
//! and returns the next state plus the [`Effect`]s the controller must
//! carry out (start or cancel the processing task, or forward a
//! [`ViewCommand`]). Nothing here sleeps, spawns or touches I/O.
//!
//! ```text
//!            submit (invalid)           submit (valid)
//!   Idle ───────────────────▶ Errored ─────────────────▶ Processing
//!    ▲  ◀── edit key / file ───┘                          │     │
//!    │                                        ok          │     │ fault
//!    │           reset               ┌────────────────────┘     ▼
//!    └──────────────────────── Processed                     Errored
//! ```

use crate::api_key::ApiKey;
use crate::config::FormConfig;
use crate::error::{ProcessingError, ValidationError};
use crate::file::SelectedFile;
use crate::processor::ProcessingReceipt;
use serde::Serialize;
use tracing::debug;

/// Identifies one accepted submission. Increases monotonically per form.
pub type Ticket = u64;

/// Where the form is in its submit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "snake_case")]
pub enum Phase {
    /// Nothing submitted, or the last error was cleared.
    #[default]
    Idle,
    /// Last submit failed validation or processing. Holds the banner text.
    Errored(String),
    /// A submission is in flight.
    Processing(Ticket),
    /// The last submission succeeded.
    Processed(ProcessingReceipt),
}

/// Something the user (or the processing task) did.
#[derive(Debug, Clone)]
pub enum FormEvent {
    SelectFile(SelectedFile),
    EditApiKey(ApiKey),
    ToggleKeyVisibility,
    Submit,
    Completed {
        ticket: Ticket,
        result: Result<ProcessingReceipt, ProcessingError>,
    },
    Reset,
}

/// UI work that lives outside the form model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewCommand {
    /// The file picker must drop its displayed selection.
    ClearFileInput,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the processor for this submission.
    StartProcessing {
        ticket: Ticket,
        file: SelectedFile,
        api_key: ApiKey,
    },
    /// Abort the in-flight submission; its completion will be stale.
    CancelProcessing { ticket: Ticket },
    View(ViewCommand),
}

/// Everything the form shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub file: Option<SelectedFile>,
    pub api_key: ApiKey,
    pub phase: Phase,
    pub key_visible: bool,
    next_ticket: Ticket,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.phase, Phase::Processing(_))
    }

    pub fn is_processed(&self) -> bool {
        matches!(self.phase, Phase::Processed(_))
    }

    /// Banner error text; empty when there is no error.
    pub fn error_message(&self) -> &str {
        match &self.phase {
            Phase::Errored(msg) => msg,
            _ => "",
        }
    }

    /// Ticket of the in-flight submission, if any.
    pub fn in_flight(&self) -> Option<Ticket> {
        match self.phase {
            Phase::Processing(t) => Some(t),
            _ => None,
        }
    }

    /// Submit is disabled while busy and after success.
    pub fn submit_enabled(&self) -> bool {
        !self.is_processing() && !self.is_processed()
    }

    /// "Process Another" is only offered after success.
    pub fn reset_visible(&self) -> bool {
        self.is_processed()
    }

    /// Form fields back to their initial values. Visibility and the ticket
    /// counter are kept.
    fn cleared(self) -> Self {
        Self {
            file: None,
            api_key: ApiKey::default(),
            phase: Phase::Idle,
            key_visible: self.key_visible,
            next_ticket: self.next_ticket,
        }
    }
}

/// Check submit preconditions in the order the user sees them.
pub fn validate(
    file: Option<&SelectedFile>,
    api_key: &ApiKey,
    config: &FormConfig,
) -> Result<(), ValidationError> {
    let file = file.ok_or(ValidationError::FileRequired)?;

    if api_key.is_blank() {
        return Err(ValidationError::ApiKeyRequired);
    }

    if config.enforce_file_limits {
        if !file.has_accepted_extension(&config.accepted_extensions) {
            return Err(ValidationError::UnsupportedFileType {
                name: file.name.clone(),
            });
        }
        if file.size_bytes > config.max_file_size_bytes {
            return Err(ValidationError::FileTooLarge {
                name: file.name.clone(),
                size_bytes: file.size_bytes,
                max_bytes: config.max_file_size_bytes,
            });
        }
    }

    Ok(())
}

/// Apply one event to the form.
pub fn transition(
    state: FormState,
    event: FormEvent,
    config: &FormConfig,
) -> (FormState, Vec<Effect>) {
    let mut state = state;
    let mut effects = Vec::new();

    match event {
        FormEvent::SelectFile(file) => {
            if let Some(ticket) = state.in_flight() {
                effects.push(Effect::CancelProcessing { ticket });
            }
            state.file = Some(file);
            state.phase = Phase::Idle;
        }

        FormEvent::EditApiKey(key) => {
            state.api_key = key;
            if matches!(state.phase, Phase::Errored(_)) {
                state.phase = Phase::Idle;
            }
        }

        FormEvent::ToggleKeyVisibility => {
            state.key_visible = !state.key_visible;
        }

        FormEvent::Submit => {
            if !state.submit_enabled() {
                debug!("Submit ignored in phase {:?}", state.phase);
                return (state, effects);
            }
            match validate(state.file.as_ref(), &state.api_key, config) {
                Err(e) => state.phase = Phase::Errored(e.to_string()),
                Ok(()) => {
                    let ticket = state.next_ticket;
                    state.next_ticket += 1;
                    state.phase = Phase::Processing(ticket);
                    if let Some(file) = state.file.clone() {
                        effects.push(Effect::StartProcessing {
                            ticket,
                            file,
                            api_key: state.api_key.clone(),
                        });
                    }
                }
            }
        }

        FormEvent::Completed { ticket, result } => {
            if state.in_flight() != Some(ticket) {
                debug!("Discarding stale completion for ticket {}", ticket);
                return (state, effects);
            }
            state.phase = match result {
                Ok(receipt) => Phase::Processed(receipt),
                Err(ProcessingError::Cancelled) => Phase::Idle,
                Err(e @ ProcessingError::Failed { .. }) => {
                    Phase::Errored(e.banner_message().to_string())
                }
            };
        }

        FormEvent::Reset => {
            if let Some(ticket) = state.in_flight() {
                effects.push(Effect::CancelProcessing { ticket });
            }
            state = state.cleared();
            effects.push(Effect::View(ViewCommand::ClearFileInput));
        }
    }

    (state, effects)
}
