//! Runtime configuration shared by every element in a document.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ElementError;

/// Default readiness polling interval in milliseconds.
pub const DEFAULT_READY_POLL_INTERVAL_MS: u64 = 10;
/// Default lifetime of a screen-reader announcement in milliseconds.
pub const DEFAULT_ANNOUNCEMENT_TTL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// User-facing strings and timings applied by the element runtime.
///
/// Every field has a default, so partial JSON documents are accepted.
pub struct ElementsConfig {
    /// Interval between registry checks while waiting for readiness.
    pub ready_poll_interval_ms: u64,
    /// How long a live-region announcement stays in the document.
    pub announcement_ttl_ms: u64,
    /// Group message when any descendant is invalid.
    pub group_invalid_message: String,
    /// Group message when every descendant is valid.
    pub group_valid_message: String,
    /// Placeholder option rendered by selects without options.
    pub select_placeholder: String,
    /// Accessible label of the alert dismiss control.
    pub close_label: String,
    /// Prefix of the accessible label of per-file remove buttons.
    pub remove_file_label: String,
    /// Announcement emitted after a file is removed; the file name is appended.
    pub file_removed_announcement: String,
    /// Visual marker appended to labels of required controls.
    pub required_marker: String,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            ready_poll_interval_ms: DEFAULT_READY_POLL_INTERVAL_MS,
            announcement_ttl_ms: DEFAULT_ANNOUNCEMENT_TTL_MS,
            group_invalid_message: "Alcuni campi contengono errori".to_string(),
            group_valid_message: "Tutti i campi sono validi".to_string(),
            select_placeholder: "Seleziona un'opzione...".to_string(),
            close_label: "Close".to_string(),
            remove_file_label: "Rimuovi".to_string(),
            file_removed_announcement: "File rimosso:".to_string(),
            required_marker: "*".to_string(),
        }
    }
}

impl ElementsConfig {
    /// Parses a JSON configuration document, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ElementError::Config`] when the payload is not valid JSON for this shape.
    pub fn from_json(raw: &str) -> Result<Self, ElementError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Readiness polling interval.
    pub fn ready_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ready_poll_interval_ms)
    }

    /// Announcement time-to-live.
    pub fn announcement_ttl(&self) -> Duration {
        Duration::from_millis(self.announcement_ttl_ms)
    }
}
