//! Raw log reader
//!
//! Presentation logs are tab-delimited text. A fixed number of metadata lines
//! (scenario name, log date, ...) precede the column header and are skipped
//! without looking at their content.

use crate::types::{ExtractorError, RawLogRow, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Column holding the trial number
pub const TRIAL_COLUMN: &str = "Trial";
/// Column holding the event name
pub const NAME_COLUMN: &str = "name(str)";
/// Column holding the raw timestamp
pub const TIME_COLUMN: &str = "Time";

const REQUIRED_COLUMNS: [&str; 3] = [TRIAL_COLUMN, NAME_COLUMN, TIME_COLUMN];

/// Read every row of a log file on disk
pub fn read_log_file(path: &Path, preamble_lines: usize) -> Result<Vec<RawLogRow>> {
    log::info!("Reading log file: {:?}", path);

    let file = File::open(path)?;
    read_log(file, preamble_lines)
}

/// Read every row of a log from any byte source
pub fn read_log<R: Read>(source: R, preamble_lines: usize) -> Result<Vec<RawLogRow>> {
    let mut reader = BufReader::new(source);
    skip_preamble(&mut reader, preamble_lines)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| csv_error(e, preamble_lines))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ExtractorError::MissingColumn(column.to_string()));
        }
    }
    log::debug!("Log header has {} columns", headers.len());

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<RawLogRow>() {
        rows.push(record.map_err(|e| csv_error(e, preamble_lines))?);
    }

    log::info!("Read {} rows from log", rows.len());
    Ok(rows)
}

/// Convert a csv error, reporting line numbers relative to the whole file
fn csv_error(err: csv::Error, preamble_lines: usize) -> ExtractorError {
    let file_line = |pos: &csv::Position| pos.line() + preamble_lines as u64;
    match err.into_kind() {
        csv::ErrorKind::Io(e) => ExtractorError::Io(e),
        csv::ErrorKind::Deserialize { pos, err } => ExtractorError::LogParse(match pos {
            Some(pos) => format!("line {}: {}", file_line(&pos), err),
            None => err.to_string(),
        }),
        csv::ErrorKind::Utf8 { pos, err } => ExtractorError::LogParse(match pos {
            Some(pos) => format!("line {}: invalid UTF-8: {}", file_line(&pos), err),
            None => format!("invalid UTF-8: {}", err),
        }),
        other => ExtractorError::LogParse(format!("{:?}", other)),
    }
}

/// Discard the metadata lines that precede the column header
fn skip_preamble<R: BufRead>(reader: &mut R, lines: usize) -> Result<()> {
    let mut line = Vec::new();
    for skipped in 0..lines {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Err(ExtractorError::LogParse(format!(
                "log ended after {} of {} preamble lines",
                skipped, lines
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREAMBLE: &str = "Scenario - ElectroHeat_Conditioning\nLogfile written - 01/01/2024 10:00:00\n\n\n";

    fn log_text(body: &str) -> String {
        format!("{}{}", PREAMBLE, body)
    }

    #[test]
    fn test_read_rows_after_preamble() {
        let text = log_text(
            "Subject\tTrial\tname(str)\tTime\tTTime\n\
             002\t1\tfMRI_T0\t1000000\t0\n\
             002\t1\tVAS\t1050000\t50000\n",
        );

        let rows = read_log(text.as_bytes(), 4).unwrap();
        assert_eq!(
            rows,
            vec![
                RawLogRow::new(1, "fMRI_T0", 1000000),
                RawLogRow::new(1, "VAS", 1050000),
            ]
        );
    }

    #[test]
    fn test_missing_column_is_reported() {
        let text = log_text("Trial\tname(str)\n1\tVAS\n");

        let err = read_log(text.as_bytes(), 4).unwrap_err();
        assert!(matches!(err, ExtractorError::MissingColumn(ref c) if c == TIME_COLUMN));
    }

    #[test]
    fn test_malformed_time_is_parse_error() {
        let text = log_text("Trial\tname(str)\tTime\n1\tVAS\tsoon\n");

        let err = read_log(text.as_bytes(), 4).unwrap_err();
        assert!(matches!(err, ExtractorError::LogParse(_)));
    }

    #[test]
    fn test_parse_error_line_counts_preamble() {
        let text = log_text("Trial\tname(str)\tTime\n1\tfMRI_T0\t0\n1\tVAS\tsoon\n");

        let err = read_log(text.as_bytes(), 4).unwrap_err();
        assert!(err.to_string().contains("line 7:"), "{}", err);
    }

    #[test]
    fn test_decimal_time_is_rejected() {
        // Raw times are integer ticks; a decimal cell is a malformed log
        let text = log_text("Trial\tname(str)\tTime\n1\tfMRI_T0\t1000000.0\n");

        let err = read_log(text.as_bytes(), 4).unwrap_err();
        assert!(matches!(err, ExtractorError::LogParse(_)));
    }

    #[test]
    fn test_truncated_preamble() {
        let err = read_log("only one line\n".as_bytes(), 4).unwrap_err();
        assert!(matches!(err, ExtractorError::LogParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_log_file(Path::new("does/not/exist.log"), 4).unwrap_err();
        assert!(matches!(err, ExtractorError::Io(_)));
    }
}
