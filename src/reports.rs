//! Accepted reports: saving, searching and text export.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::Connection;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::{get_report, insert_report, list_reports, profile_exists};
use crate::db::DatabaseError;
use crate::models::{ExtractedObservation, StoredReport};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Report not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Accept an observation into the user's report list.
pub fn save_observation(
    conn: &Connection,
    username: &str,
    observation: ExtractedObservation,
) -> Result<StoredReport, ReportError> {
    if !profile_exists(conn, username)? {
        return Err(ReportError::UnknownUser(username.to_string()));
    }
    let report = StoredReport {
        id: Uuid::new_v4(),
        username: username.to_string(),
        created_at: Utc::now(),
        observation,
    };
    insert_report(conn, &report)?;
    tracing::info!(
        report_id = %report.id,
        username = %username,
        test_name = %report.observation.test_name,
        "Report saved"
    );
    Ok(report)
}

/// A user's reports, optionally narrowed by a search term.
pub fn user_reports(
    conn: &Connection,
    username: &str,
    search: Option<&str>,
) -> Result<Vec<StoredReport>, ReportError> {
    if !profile_exists(conn, username)? {
        return Err(ReportError::UnknownUser(username.to_string()));
    }
    let reports = list_reports(conn, username)?;
    Ok(match search {
        Some(term) => filter_reports(&reports, term).into_iter().cloned().collect(),
        None => reports,
    })
}

/// One of the user's reports. Reports of other users are not found.
pub fn find_user_report(
    conn: &Connection,
    username: &str,
    id: &Uuid,
) -> Result<StoredReport, ReportError> {
    get_report(conn, id)?
        .filter(|r| r.username == username)
        .ok_or(ReportError::NotFound(*id))
}

/// Reports matching `term`, in their original order.
pub fn filter_reports<'a>(reports: &'a [StoredReport], term: &str) -> Vec<&'a StoredReport> {
    reports.iter().filter(|r| report_matches(r, term)).collect()
}

/// Names match case-insensitively; the ISO date and the value match
/// case-sensitively. An empty term matches everything.
pub fn report_matches(report: &StoredReport, term: &str) -> bool {
    let obs = &report.observation;
    let needle = term.to_lowercase();
    obs.test_name.to_lowercase().contains(&needle)
        || obs.date.to_string().contains(term)
        || obs.value.contains(term)
        || obs.lab_name.to_lowercase().contains(&needle)
        || obs.doctor_name.to_lowercase().contains(&needle)
}

/// Downloadable text summary of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportExport {
    pub file_name: String,
    pub content: String,
}

pub fn export_report(report: &StoredReport) -> ReportExport {
    let obs = &report.observation;
    let date = obs.date.to_string();
    let content = format!(
        "Medical Report for {test} - {date}\n\
         Value: {value}\n\
         Unit: {unit}\n\
         Reference Range: {range}\n\
         Status: {status}\n\
         Lab: {lab}\n\
         Doctor: {doctor}\n\
         Source File: {file}\n",
        test = obs.test_name,
        value = obs.value,
        unit = obs.unit,
        range = obs.reference_range,
        status = obs.status,
        lab = obs.lab_name,
        doctor = obs.doctor_name,
        file = obs.original_file,
    );
    ReportExport {
        file_name: format!("{}_{date}.txt", file_safe(&obs.test_name)),
        content,
    }
}

/// Write the export into `dir` and return the file path.
pub fn write_export(report: &StoredReport, dir: &Path) -> Result<PathBuf, ReportError> {
    let export = export_report(report);
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&export.file_name);
    std::fs::write(&path, export.content)?;
    tracing::info!(report_id = %report.id, path = %path.display(), "Report exported");
    Ok(path)
}

fn file_safe(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    // Dots only would resolve to a directory.
    if safe.trim_matches('.').is_empty() {
        "report".to_string()
    } else {
        safe
    }
}
