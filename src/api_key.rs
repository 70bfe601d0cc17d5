//! The API key text field.
//!
//! The key lives only in memory for the lifetime of the form. It is never
//! written to logs: `Debug` is redacted and there is no `Display` impl, so
//! the only way to read the text is [`ApiKey::expose`].

use std::fmt;

/// Character used to mask each key character when the field is hidden.
pub const MASK_CHAR: char = '•';

/// Free-text API key as typed by the user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// True when the text is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Raw text, exactly as entered.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Text to display in the field: masked unless `visible`.
    pub fn display(&self, visible: bool) -> String {
        if visible {
            self.0.clone()
        } else {
            self.0.chars().map(|_| MASK_CHAR).collect()
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}
