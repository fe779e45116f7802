//! Main extractor API
//!
//! The [`Extractor`] turns the rows of a raw presentation log into trial events
//! timed relative to the start marker. It is stateless between calls; the only
//! side effect of an extraction is the diagnostics handed to its reporter.

use crate::config::ExtractorConfig;
use crate::reader;
use crate::report::{Diagnostic, LogReporter, Reporter};
use crate::types::{ExtractorError, RawLogRow, Result, TrialEvent};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// Extracts trial events from raw presentation logs
pub struct Extractor<R = LogReporter> {
    config: ExtractorConfig,
    reporter: R,
}

impl Extractor<LogReporter> {
    /// Create an extractor that reports through the `log` crate
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Self::with_reporter(config, LogReporter)
    }
}

impl<R: Reporter> Extractor<R> {
    /// Create an extractor with a caller-supplied reporter
    pub fn with_reporter(config: ExtractorConfig, reporter: R) -> Result<Self> {
        Ok(Self {
            config: config.normalized()?,
            reporter,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Load a log file and extract its trial events
    ///
    /// # Example
    /// ```no_run
    /// use trial_events::{Extractor, ExtractorConfig};
    /// use std::path::Path;
    ///
    /// let config = ExtractorConfig::new("fMRI_T0", "END").with_trial_types(["VAS", "PAIN"]);
    /// let extractor = Extractor::new(config).unwrap();
    /// let events = extractor.extract_file(Path::new("sub-002.log")).unwrap();
    /// ```
    pub fn extract_file(&self, path: &Path) -> Result<Vec<TrialEvent>> {
        let rows = reader::read_log_file(path, self.config.preamble_lines)
            .map_err(|e| self.load_failed(e))?;
        self.extract_rows(&rows)
    }

    /// Load a log from any byte source and extract its trial events
    pub fn extract_reader<S: Read>(&self, source: S) -> Result<Vec<TrialEvent>> {
        let rows = reader::read_log(source, self.config.preamble_lines)
            .map_err(|e| self.load_failed(e))?;
        self.extract_rows(&rows)
    }

    fn load_failed(&self, err: ExtractorError) -> ExtractorError {
        self.reporter.report(&Diagnostic::LoadFailed(err.to_string()));
        err
    }

    /// Extract trial events from rows already in memory
    ///
    /// Rows are processed in the order given. Durations are taken between
    /// neighbouring retained rows in that order, so a log that is not sorted by
    /// time yields durations that follow the table, not the clock.
    pub fn extract_rows(&self, rows: &[RawLogRow]) -> Result<Vec<TrialEvent>> {
        let config = &self.config;
        let names: Vec<String> = rows.iter().map(RawLogRow::normalized_name).collect();
        let present: BTreeSet<&str> = names.iter().map(String::as_str).collect();

        let missing_markers: Vec<String> = [&config.start_marker, &config.end_marker]
            .into_iter()
            .filter(|marker| !present.contains(marker.as_str()))
            .cloned()
            .collect();
        if !missing_markers.is_empty() {
            self.reporter
                .report(&Diagnostic::MissingMarkers(missing_markers.clone()));
            return Err(ExtractorError::MissingMarkers(missing_markers));
        }

        let missing_types: Vec<String> = config
            .trial_types
            .iter()
            .filter(|t| !present.contains(t.as_str()))
            .cloned()
            .collect();
        if !missing_types.is_empty() {
            self.reporter
                .report(&Diagnostic::MissingTrialTypes(missing_types));
        }

        // First occurrence in table order anchors the timeline
        let start_time_raw = first_time(rows, &names, &config.start_marker)?;
        let end_time_raw = first_time(rows, &names, &config.end_marker)?;
        log::debug!(
            "Start marker {} at {}, end marker {} at {}",
            config.start_marker,
            start_time_raw,
            config.end_marker,
            end_time_raw
        );

        let scale = f64::from(config.time_units_per_second);
        let retained: Vec<TrialEvent> = rows
            .iter()
            .zip(&names)
            .filter(|(_, name)| config.is_retained(name))
            .map(|(row, name)| TrialEvent {
                trial_num: row.trial_index,
                trial_type: name.clone(),
                onset: (row.time_raw as f64 - start_time_raw as f64) / scale,
                duration: 0.0,
            })
            .collect();

        let retained = assign_durations(retained, end_time_raw as f64, scale);
        let retained_count = retained.len();

        let events: Vec<TrialEvent> = retained
            .into_iter()
            .filter(|event| !config.is_marker(&event.trial_type))
            .collect();

        self.reporter.report(&Diagnostic::Extracted {
            retained: retained_count,
            emitted: events.len(),
        });

        Ok(events)
    }
}

/// Raw time of the first row carrying `marker`
fn first_time(rows: &[RawLogRow], names: &[String], marker: &str) -> Result<i64> {
    names
        .iter()
        .position(|name| name == marker)
        .map(|i| rows[i].time_raw)
        .ok_or_else(|| ExtractorError::MissingMarkers(vec![marker.to_string()]))
}

/// Fill in durations over the retained rows
///
/// Every row but the last lasts until the next row's onset. The last row is
/// measured against the end marker as `(end_time_raw - onset * scale) / scale`.
fn assign_durations(mut events: Vec<TrialEvent>, end_time_raw: f64, scale: f64) -> Vec<TrialEvent> {
    let next_onsets: Vec<Option<f64>> = events
        .iter()
        .skip(1)
        .map(|e| Some(e.onset))
        .chain(std::iter::once(None))
        .collect();

    for (event, next_onset) in events.iter_mut().zip(next_onsets) {
        event.duration = match next_onset {
            Some(next) => (event.onset - next).abs(),
            None => (end_time_raw - event.onset * scale) / scale,
        };
    }

    events
}
