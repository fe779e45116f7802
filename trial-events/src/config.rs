//! Extractor configuration types
//!
//! This module defines the parameters of a single extraction: which markers anchor
//! the timeline, which trial types are of interest, and how the raw log is laid out.

use crate::types::{normalize, ExtractorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of metadata lines preceding the column header in a presentation log
pub const DEFAULT_PREAMBLE_LINES: usize = 4;

/// Raw log ticks per second (the log records tenths of milliseconds)
pub const DEFAULT_TIME_UNITS_PER_SECOND: u32 = 10_000;

/// Configuration for one extraction
///
/// Marker and trial type names are stored upper-cased, so every comparison made
/// with them is case-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Marker whose time is the zero point for every onset
    pub start_marker: String,

    /// Marker bounding the duration of the last retained event
    pub end_marker: String,

    /// Trial types to report
    #[serde(default)]
    pub trial_types: BTreeSet<String>,

    /// Lines skipped before the column header (default: 4)
    #[serde(default = "default_preamble_lines")]
    pub preamble_lines: usize,

    /// Raw time units per second of output (default: 10000)
    #[serde(default = "default_time_units_per_second")]
    pub time_units_per_second: u32,
}

fn default_preamble_lines() -> usize {
    DEFAULT_PREAMBLE_LINES
}

fn default_time_units_per_second() -> u32 {
    DEFAULT_TIME_UNITS_PER_SECOND
}

impl ExtractorConfig {
    /// Create a new configuration anchored on the given start and end markers
    pub fn new(start_marker: impl AsRef<str>, end_marker: impl AsRef<str>) -> Self {
        Self {
            start_marker: normalize(start_marker.as_ref()),
            end_marker: normalize(end_marker.as_ref()),
            trial_types: BTreeSet::new(),
            preamble_lines: DEFAULT_PREAMBLE_LINES,
            time_units_per_second: DEFAULT_TIME_UNITS_PER_SECOND,
        }
    }

    /// Builder method: add a trial type of interest
    pub fn add_trial_type(mut self, trial_type: impl AsRef<str>) -> Self {
        self.trial_types.insert(normalize(trial_type.as_ref()));
        self
    }

    /// Builder method: add several trial types of interest
    pub fn with_trial_types<I, S>(mut self, trial_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.trial_types
            .extend(trial_types.into_iter().map(|t| normalize(t.as_ref())));
        self
    }

    /// Builder method: set the number of preamble lines to skip
    pub fn with_preamble_lines(mut self, lines: usize) -> Self {
        self.preamble_lines = lines;
        self
    }

    /// Builder method: set the raw time resolution
    pub fn with_time_units_per_second(mut self, units: u32) -> Self {
        self.time_units_per_second = units;
        self
    }

    /// Bring a configuration built by hand or deserialized into canonical form
    ///
    /// Upper-cases every name and rejects settings the transform cannot use.
    pub fn normalized(mut self) -> Result<Self> {
        self.start_marker = normalize(&self.start_marker);
        self.end_marker = normalize(&self.end_marker);
        self.trial_types = self.trial_types.iter().map(|t| normalize(t)).collect();

        if self.start_marker.is_empty() {
            return Err(ExtractorError::InvalidConfig(
                "start marker must not be empty".into(),
            ));
        }
        if self.end_marker.is_empty() {
            return Err(ExtractorError::InvalidConfig(
                "end marker must not be empty".into(),
            ));
        }
        if self.time_units_per_second == 0 {
            return Err(ExtractorError::InvalidConfig(
                "time units per second must be positive".into(),
            ));
        }

        Ok(self)
    }

    /// Check if a (normalized) name is one of the two timing markers
    pub fn is_marker(&self, name: &str) -> bool {
        name == self.start_marker || name == self.end_marker
    }

    /// Check if a (normalized) name should be kept by the filtering step
    pub fn is_retained(&self, name: &str) -> bool {
        self.is_marker(name) || self.trial_types.contains(name)
    }
}
