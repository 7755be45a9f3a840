//! Roster export and import.
//!
//! Two formats: flat CSV (`date,physician,role,period`, one row per
//! half-day assignment) for spreadsheet handoff, and a JSON document
//! carrying the assignments plus roster metadata. CSV can be read
//! back into a [`Schedule`], so exported rosters survive a round
//! trip through external editing.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Assignment, HalfDay, Role, Schedule};

/// Export/import failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io failure: {0}")]
    Io(#[from] io::Error),
    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    physician: String,
    role: Role,
    period: HalfDay,
}

/// Inclusive first and last assignment dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Roster summary attached to JSON exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMetadata {
    pub total_assignments: usize,
    /// Absent for an empty roster.
    pub date_range: Option<DateRange>,
}

/// JSON export document: assignments plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterDocument {
    pub assignments: Vec<Assignment>,
    pub metadata: RosterMetadata,
}

impl RosterDocument {
    /// Builds the export document for a roster.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let date_range = schedule
            .date_range()
            .map(|(start, end)| DateRange { start, end });
        Self {
            assignments: schedule.assignments.clone(),
            metadata: RosterMetadata {
                total_assignments: schedule.assignment_count(),
                date_range,
            },
        }
    }
}

/// Writes a roster as CSV.
pub fn write_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for assignment in &schedule.assignments {
        csv_writer.serialize(CsvRow {
            date: assignment.day,
            physician: assignment.physician.clone(),
            role: assignment.role,
            period: assignment.period,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes a roster as CSV to a file.
pub fn write_csv_file(schedule: &Schedule, path: impl AsRef<Path>) -> Result<(), ExportError> {
    write_csv(schedule, File::create(path)?)
}

/// Reads a CSV roster back into a sorted [`Schedule`].
pub fn read_csv<R: Read>(reader: R) -> Result<Schedule, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut assignments = Vec::new();
    for row in csv_reader.deserialize() {
        let row: CsvRow = row?;
        assignments.push(Assignment::new(row.physician, row.date, row.period, row.role));
    }
    Ok(Schedule::from_assignments(assignments))
}

/// Reads a CSV roster from a file.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Schedule, ExportError> {
    read_csv(File::open(path)?)
}

/// Writes a roster as a pretty-printed JSON document.
pub fn write_json<W: Write>(schedule: &Schedule, writer: W) -> Result<(), ExportError> {
    let document = RosterDocument::from_schedule(schedule);
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// Writes the JSON document to a file.
pub fn write_json_file(schedule: &Schedule, path: impl AsRef<Path>) -> Result<(), ExportError> {
    write_json(schedule, File::create(path)?)
}
