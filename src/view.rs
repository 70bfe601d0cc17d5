//! View model: the form as the user sees it, computed from state.
//!
//! [`FormView`] is plain data. The CLI prints it or serialises it to JSON;
//! any other front end can draw it the same way. No rendering decision is
//! made anywhere else.

use crate::config::FormConfig;
use crate::file::accept_attribute;
use crate::state::{FormState, Phase};
use serde::Serialize;

pub const TITLE: &str = "Document Processor";
pub const SUBTITLE: &str = "Upload your document and process it with AI";
pub const CARD_TITLE: &str = "Process Document";
pub const CARD_DESCRIPTION: &str =
    "Upload a file and provide your API key to process the document";
pub const SUBMIT_LABEL: &str = "Process Document";
pub const SUBMIT_BUSY_LABEL: &str = "Processing...";
pub const RESET_LABEL: &str = "Process Another";
pub const KEY_PLACEHOLDER: &str = "Enter your API key";
pub const PRIVACY_TITLE: &str = "Security and Privacy";
pub const PRIVACY_NOTICE: &str = "Your API key is not stored in our databases. \
It is used only to process your document and is discarded immediately after processing.";
pub const FOOTER: &str = "Your files and API keys are processed securely and not stored.";

/// Inline status banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Banner {
    Error(String),
    Success(String),
}

impl Banner {
    pub fn message(&self) -> &str {
        match self {
            Banner::Error(m) | Banner::Success(m) => m,
        }
    }
}

/// Success banner text for a processed file.
pub fn success_message(file_name: &str) -> String {
    format!(
        "Document processed successfully! Your file \"{file_name}\" has been analyzed and processed."
    )
}

/// The rendered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub card_title: &'static str,
    pub card_description: &'static str,

    /// Picker filter, e.g. `.pdf,.doc,.docx,.txt,.md`.
    pub file_accept: String,
    /// `Selected: name (x.xx MB)` once a file is chosen.
    pub selected_file: Option<String>,

    pub api_key_display: String,
    pub api_key_placeholder: &'static str,
    pub api_key_visible: bool,
    /// Accessible label of the show/hide toggle.
    pub key_toggle_label: &'static str,

    pub banner: Option<Banner>,

    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub show_spinner: bool,
    /// `Some("Process Another")` only after success.
    pub reset_label: Option<&'static str>,

    pub supported_types: String,
    pub privacy_title: &'static str,
    pub privacy_notice: &'static str,
    pub footer: &'static str,
}

impl FormView {
    pub fn render(state: &FormState, config: &FormConfig) -> Self {
        let banner = match &state.phase {
            Phase::Errored(msg) if !msg.is_empty() => Some(Banner::Error(msg.clone())),
            Phase::Processed(receipt) => {
                let name = state
                    .file
                    .as_ref()
                    .map(|f| f.name.as_str())
                    .unwrap_or(receipt.file_name.as_str());
                Some(Banner::Success(success_message(name)))
            }
            _ => None,
        };

        let processing = state.is_processing();

        Self {
            title: TITLE,
            subtitle: SUBTITLE,
            card_title: CARD_TITLE,
            card_description: CARD_DESCRIPTION,
            file_accept: accept_attribute(&config.accepted_extensions),
            selected_file: state
                .file
                .as_ref()
                .map(|f| format!("Selected: {} ({})", f.name, f.size_display())),
            api_key_display: state.api_key.display(state.key_visible),
            api_key_placeholder: KEY_PLACEHOLDER,
            api_key_visible: state.key_visible,
            key_toggle_label: if state.key_visible {
                "Hide API key"
            } else {
                "Show API key"
            },
            banner,
            submit_label: if processing {
                SUBMIT_BUSY_LABEL
            } else {
                SUBMIT_LABEL
            },
            submit_enabled: state.submit_enabled(),
            show_spinner: processing,
            reset_label: state.reset_visible().then_some(RESET_LABEL),
            supported_types: supported_types_text(config),
            privacy_title: PRIVACY_TITLE,
            privacy_notice: PRIVACY_NOTICE,
            footer: FOOTER,
        }
    }
}

/// `PDF, DOC, DOCX, TXT, MD (Max size: 10MB)`.
fn supported_types_text(config: &FormConfig) -> String {
    let types = config
        .accepted_extensions
        .iter()
        .map(|e| e.to_uppercase())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} (Max size: {}MB)", types, config.max_file_size_mb())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_key::ApiKey;
    use crate::file::SelectedFile;
    use crate::processor::ProcessingReceipt;

    fn receipt() -> ProcessingReceipt {
        ProcessingReceipt {
            file_name: "report.pdf".into(),
            size_bytes: 2 * 1024 * 1024,
            processor: "simulated".into(),
            elapsed_ms: 2000,
        }
    }

    #[test]
    fn initial_view() {
        let v = FormView::render(&FormState::new(), &FormConfig::default());
        assert_eq!(v.submit_label, "Process Document");
        assert!(v.submit_enabled);
        assert!(v.banner.is_none());
        assert!(v.reset_label.is_none());
        assert!(v.selected_file.is_none());
        assert_eq!(v.file_accept, ".pdf,.doc,.docx,.txt,.md");
        assert_eq!(v.supported_types, "PDF, DOC, DOCX, TXT, MD (Max size: 10MB)");
        assert_eq!(v.key_toggle_label, "Show API key");
    }

    #[test]
    fn processing_view_shows_spinner_and_disables_submit() {
        let mut s = FormState::new();
        s.phase = Phase::Processing(0);
        let v = FormView::render(&s, &FormConfig::default());
        assert_eq!(v.submit_label, "Processing...");
        assert!(v.show_spinner);
        assert!(!v.submit_enabled);
    }

    #[test]
    fn processed_view_references_file_and_offers_reset() {
        let mut s = FormState::new();
        s.file = Some(SelectedFile::new("report.pdf", 2 * 1024 * 1024));
        s.phase = Phase::Processed(receipt());
        let v = FormView::render(&s, &FormConfig::default());

        assert_eq!(v.selected_file.as_deref(), Some("Selected: report.pdf (2.00 MB)"));
        match v.banner {
            Some(Banner::Success(ref m)) => assert!(m.contains("\"report.pdf\""), "got: {m}"),
            ref other => panic!("expected success banner, got {other:?}"),
        }
        assert!(!v.submit_enabled);
        assert_eq!(v.reset_label, Some("Process Another"));
    }

    #[test]
    fn error_view() {
        let mut s = FormState::new();
        s.phase = Phase::Errored("Please enter your API key".into());
        let v = FormView::render(&s, &FormConfig::default());
        assert_eq!(v.banner, Some(Banner::Error("Please enter your API key".into())));
        assert!(v.submit_enabled);
    }

    #[test]
    fn key_masking_follows_visibility() {
        let mut s = FormState::new();
        s.api_key = ApiKey::new("abc");
        let hidden = FormView::render(&s, &FormConfig::default());
        assert_eq!(hidden.api_key_display, "•••");

        s.key_visible = true;
        let shown = FormView::render(&s, &FormConfig::default());
        assert_eq!(shown.api_key_display, "abc");
        assert_eq!(shown.key_toggle_label, "Hide API key");
    }

    #[test]
    fn serialises_to_json() {
        let mut s = FormState::new();
        s.phase = Phase::Errored("Please select a file to process".into());
        let v = FormView::render(&s, &FormConfig::default());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["banner"]["kind"], "error");
        assert_eq!(json["banner"]["message"], "Please select a file to process");
        assert_eq!(json["submit_enabled"], true);
    }
}
