//! Trial Event Extractor Library
//!
//! A stateless library for turning raw behavioral-experiment logs (as written by
//! stimulus presentation software) into trial events with onsets and durations in
//! seconds, relative to an experiment start marker.
//!
//! # Architecture
//!
//! The library is one linear transform with validation gates:
//! - Reads the tab-delimited log, skipping its metadata preamble
//! - Upper-cases event names and validates the start/end markers
//! - Keeps the requested trial types, timed against the first start marker
//! - Computes durations between neighbouring retained events
//!
//! The library does NOT:
//! - Initialize logging (diagnostics go to a caller-supplied [`Reporter`])
//! - Write output files
//! - Process several logs at once
//!
//! Rendering and the command line live in the application layer (trial-events-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use trial_events::{Extractor, ExtractorConfig};
//! use std::path::Path;
//!
//! let config = ExtractorConfig::new("fMRI_T0", "END")
//!     .with_trial_types(["VAS", "FLANKER", "PAIN", "FIXATION"]);
//!
//! let extractor = Extractor::new(config).unwrap();
//! let events = extractor.extract_file(Path::new("sub-002.log")).unwrap();
//!
//! for event in events {
//!     println!("{} at {}s for {}s", event.trial_type, event.onset, event.duration);
//! }
//! ```

// Public modules
pub mod config;
pub mod extractor;
pub mod reader;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use config::ExtractorConfig;
pub use extractor::Extractor;
pub use report::{Diagnostic, LogReporter, MemoryReporter, Reporter};
pub use types::{ExtractorError, RawLogRow, Result, TrialEvent};

use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract trial events from a log file in one call
///
/// Diagnostics go to the `log` crate. Use [`Extractor::with_reporter`] to route
/// them elsewhere.
pub fn extract<I, S>(
    log_path: &Path,
    start_marker: &str,
    end_marker: &str,
    trial_types: I,
) -> Result<Vec<TrialEvent>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let config = ExtractorConfig::new(start_marker, end_marker).with_trial_types(trial_types);
    Extractor::new(config)?.extract_file(log_path)
}
