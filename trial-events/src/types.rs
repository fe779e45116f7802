//! Core types for the trial event extractor
//!
//! This module defines the rows read from a raw experiment log, the trial events
//! the extractor emits, and the error type shared by the whole library.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for extractor operations
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// One row of the raw experiment log
///
/// Column names follow the log header (`Trial`, `name(str)`, `Time`). Any other
/// columns in the file are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLogRow {
    /// Log-assigned trial number (not unique across rows)
    #[serde(rename = "Trial")]
    pub trial_index: u32,
    /// Event identifier as written by the presentation software
    #[serde(rename = "name(str)")]
    pub marker_name: String,
    /// Timestamp in the log's native unit (tenths of milliseconds)
    #[serde(rename = "Time")]
    pub time_raw: i64,
}

impl RawLogRow {
    /// Create a new raw row
    pub fn new(trial_index: u32, marker_name: impl Into<String>, time_raw: i64) -> Self {
        Self {
            trial_index,
            marker_name: marker_name.into(),
            time_raw,
        }
    }

    /// Marker name in its canonical (upper) case
    pub fn normalized_name(&self) -> String {
        normalize(&self.marker_name)
    }
}

/// A trial event relative to the start marker
///
/// `onset` and `duration` are expressed in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialEvent {
    pub trial_num: u32,
    pub trial_type: String,
    pub onset: f64,
    pub duration: f64,
}

impl fmt::Display for TrialEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trial {} {} onset={}s duration={}s",
            self.trial_num, self.trial_type, self.onset, self.duration
        )
    }
}

/// Errors that can occur while loading or transforming a log
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("Failed to parse log file: {0}")]
    LogParse(String),

    #[error("Required column missing from log header: {0}")]
    MissingColumn(String),

    #[error("Required trial types missing from the log file: {}", .0.join(", "))]
    MissingMarkers(Vec<String>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Canonical case used for every marker and trial type comparison
pub fn normalize(name: &str) -> String {
    name.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(normalize("fMRI_T0"), "FMRI_T0");
        assert_eq!(normalize("vas"), normalize("VAS"));
        assert_eq!(normalize("Flanker_Pause"), "FLANKER_PAUSE");
    }

    #[test]
    fn test_missing_markers_message_lists_markers() {
        let err = ExtractorError::MissingMarkers(vec!["FMRI_T0".into(), "END".into()]);
        assert_eq!(
            err.to_string(),
            "Required trial types missing from the log file: FMRI_T0, END"
        );
    }

    #[test]
    fn test_trial_event_display() {
        let event = TrialEvent {
            trial_num: 2,
            trial_type: "PAIN".into(),
            onset: 8.0,
            duration: 2.0,
        };
        assert_eq!(event.to_string(), "trial 2 PAIN onset=8s duration=2s");
    }
}
