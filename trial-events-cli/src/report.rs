//! Trial table rendering
//!
//! Renders extracted trial events as an aligned text table, a BIDS-style TSV, or
//! JSON.

use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;
use trial_events::TrialEvent;

const COLUMNS: [&str; 4] = ["trial_num", "trial_type", "onset", "duration"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    Table,
    /// Tab-separated values with a header row
    Tsv,
    /// JSON array of events
    Json,
}

/// Write `events` to `out` in the requested format
pub fn render<W: Write>(events: &[TrialEvent], format: OutputFormat, out: W) -> Result<()> {
    match format {
        OutputFormat::Table => render_table(events, out),
        OutputFormat::Tsv => render_tsv(events, out),
        OutputFormat::Json => render_json(events, out),
    }
}

fn render_table<W: Write>(events: &[TrialEvent], mut out: W) -> Result<()> {
    if events.is_empty() {
        writeln!(out, "No trial events")?;
        return Ok(());
    }

    let rows: Vec<[String; 5]> = events
        .iter()
        .enumerate()
        .map(|(i, e)| {
            [
                i.to_string(),
                e.trial_num.to_string(),
                e.trial_type.clone(),
                format_seconds(e.onset),
                format_seconds(e.duration),
            ]
        })
        .collect();

    let header = [
        String::new(),
        COLUMNS[0].to_string(),
        COLUMNS[1].to_string(),
        COLUMNS[2].to_string(),
        COLUMNS[3].to_string(),
    ];

    let mut widths: [usize; 5] = std::array::from_fn(|i| header[i].len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    for row in std::iter::once(&header).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = width))
            .collect();
        writeln!(out, "{}", line.join("  "))?;
    }

    Ok(())
}

fn render_tsv<W: Write>(events: &[TrialEvent], out: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(out);

    wtr.write_record(COLUMNS)?;
    for event in events {
        wtr.write_record([
            event.trial_num.to_string(),
            event.trial_type.clone(),
            format_seconds(event.onset),
            format_seconds(event.duration),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn render_json<W: Write>(events: &[TrialEvent], mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, events)?;
    writeln!(out)?;
    Ok(())
}

/// Seconds with four decimals, the resolution of the raw log
fn format_seconds(seconds: f64) -> String {
    format!("{:.4}", seconds)
}
