//! Diagnostics reporting
//!
//! The extractor never configures logging itself. It hands every diagnostic to a
//! [`Reporter`] supplied by the caller; [`LogReporter`] forwards them to the `log`
//! facade and [`MemoryReporter`] keeps them for inspection.

use log::Level;
use std::cell::RefCell;
use std::fmt;

/// Something the extractor has to tell its caller about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The log could not be read or parsed (extraction aborts)
    LoadFailed(String),
    /// Start and/or end marker absent from the log (extraction aborts)
    MissingMarkers(Vec<String>),
    /// Requested trial types absent from the log (extraction continues)
    MissingTrialTypes(Vec<String>),
    /// Extraction finished
    Extracted {
        /// Rows kept by the filtering step, markers included
        retained: usize,
        /// Trial events returned to the caller
        emitted: usize,
    },
}

impl Diagnostic {
    /// Severity of this diagnostic
    pub fn level(&self) -> Level {
        match self {
            Diagnostic::LoadFailed(_) | Diagnostic::MissingMarkers(_) => Level::Error,
            Diagnostic::MissingTrialTypes(_) => Level::Warn,
            Diagnostic::Extracted { .. } => Level::Info,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LoadFailed(cause) => {
                write!(f, "Failed to load data from log file: {}", cause)
            }
            Diagnostic::MissingMarkers(markers) => {
                write!(f, "Required trial types missing: {}", markers.join(", "))
            }
            Diagnostic::MissingTrialTypes(types) => write!(
                f,
                "Some specified trial types are not present in the log file: {}",
                types.join(", ")
            ),
            Diagnostic::Extracted { retained, emitted } => write!(
                f,
                "Extracted {} trial events from {} retained rows",
                emitted, retained
            ),
        }
    }
}

/// Sink for extractor diagnostics
pub trait Reporter {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic)
    }
}

/// Reporter that forwards diagnostics to the `log` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        log::log!(target: "trial_events", diagnostic.level(), "{}", diagnostic);
    }
}

/// Reporter that records diagnostics in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics received so far, oldest first
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Diagnostics at warning level or more severe
    pub fn warnings(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level() <= Level::Warn)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic.clone());
    }
}
