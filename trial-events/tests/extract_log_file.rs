// End-to-end extraction from presentation logs written to disk
use std::io::Write;
use tempfile::NamedTempFile;
use trial_events::{extract, Diagnostic, Extractor, ExtractorConfig, ExtractorError, MemoryReporter};

const PREAMBLE: &str = "Scenario - 002-D2_5_ElectroHeat_Conditioning\n\
Logfile written - 03/14/2024 09:12:44\n\
\n\
\n";

const HEADER: &str = "Subject\tTrial\tEvent Type\tname(str)\tTime\tTTime\tUncertainty\n";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_log(rows: &[(u32, &str, i64)]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PREAMBLE.as_bytes()).unwrap();
    file.write_all(HEADER.as_bytes()).unwrap();
    for (trial, name, time) in rows {
        writeln!(file, "002\t{}\tPicture\t{}\t{}\t0\t1", trial, name, time).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn extracts_reference_log_from_disk() {
    init_logging();
    let file = write_log(&[
        (1, "fMRI_T0", 1000000),
        (1, "VAS", 1050000),
        (2, "PAIN", 1080000),
        (3, "END", 1100000),
    ]);

    let events = extract(file.path(), "fMRI_T0", "END", ["VAS", "PAIN"]).unwrap();

    let summary: Vec<(u32, &str, f64, f64)> = events
        .iter()
        .map(|e| (e.trial_num, e.trial_type.as_str(), e.onset, e.duration))
        .collect();
    assert_eq!(summary, vec![(1, "VAS", 5.0, 3.0), (2, "PAIN", 8.0, 2.0)]);
}

#[test]
fn full_session_keeps_requested_types_only() {
    init_logging();
    let file = write_log(&[
        (1, "PULSE", 990000),
        (1, "fMRI_T0", 1000000),
        (1, "FIXATION", 1020000),
        (2, "vas", 1050000),
        (2, "Response", 1062500),
        (3, "FLANKER", 1070000),
        (3, "FLANKER_PAUSE", 1075000),
        (4, "PAIN", 1080000),
        (5, "END", 1100000),
    ]);

    let reporter = MemoryReporter::new();
    let config = ExtractorConfig::new("fmri_t0", "end").with_trial_types([
        "VAS",
        "FLANKER",
        "FLANKER_PAUSE",
        "ISI",
        "PAIN",
        "FIXATION",
        "TRIGGER",
        "PAUSE",
    ]);
    let extractor = Extractor::with_reporter(config, &reporter).unwrap();
    let events = extractor.extract_file(file.path()).unwrap();

    let types: Vec<&str> = events.iter().map(|e| e.trial_type.as_str()).collect();
    assert_eq!(types, vec!["FIXATION", "VAS", "FLANKER", "FLANKER_PAUSE", "PAIN"]);
    assert_eq!(events[0].onset, 2.0);
    assert_eq!(events[0].duration, 3.0);
    assert_eq!(events[4].duration, 2.0);

    assert_eq!(
        reporter.warnings(),
        vec![Diagnostic::MissingTrialTypes(vec![
            "ISI".into(),
            "PAUSE".into(),
            "TRIGGER".into()
        ])]
    );
}

#[test]
fn missing_end_marker_aborts() {
    init_logging();
    let file = write_log(&[(1, "fMRI_T0", 1000000), (1, "VAS", 1050000)]);

    let err = extract(file.path(), "fMRI_T0", "END", ["VAS"]).unwrap_err();
    assert!(matches!(err, ExtractorError::MissingMarkers(ref m) if m == &["END"]));
    assert!(err.to_string().contains("END"));
}

#[test]
fn malformed_log_is_load_failure() {
    init_logging();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PREAMBLE.as_bytes()).unwrap();
    file.write_all(b"Subject\tTrial\tname(str)\n002\t1\tVAS\n").unwrap();
    file.flush().unwrap();

    let err = extract(file.path(), "fMRI_T0", "END", ["VAS"]).unwrap_err();
    assert!(matches!(err, ExtractorError::MissingColumn(_)));
}

#[test]
fn custom_preamble_length() {
    init_logging();
    let text = "Scenario - short\n\
Trial\tname(str)\tTime\n\
1\tfMRI_T0\t0\n\
1\tVAS\t20000\n\
2\tEND\t50000\n";

    let config = ExtractorConfig::new("fMRI_T0", "END")
        .add_trial_type("VAS")
        .with_preamble_lines(1);
    let events = Extractor::new(config)
        .unwrap()
        .extract_reader(text.as_bytes())
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].onset, 2.0);
    assert_eq!(events[0].duration, 3.0);
}

#[test]
fn unreadable_log_is_reported_before_failing() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let reporter = MemoryReporter::new();
    let config = ExtractorConfig::new("fMRI_T0", "END").add_trial_type("VAS");
    let extractor = Extractor::with_reporter(config, &reporter).unwrap();

    let err = extractor
        .extract_file(&dir.path().join("missing.log"))
        .unwrap_err();

    assert!(matches!(err, ExtractorError::Io(_)));
    assert_eq!(
        reporter.diagnostics(),
        vec![Diagnostic::LoadFailed(err.to_string())]
    );
}
