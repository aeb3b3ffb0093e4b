use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::constraint_or_sqlite;
use crate::db::DatabaseError;
use crate::models::enums::StatusTier;
use crate::models::{ExtractedObservation, StoredReport};

const REPORT_COLUMNS: &str = "id, username, created_at, report_date, test_name, value, unit,
     reference_range, status, lab_name, doctor_name, original_file, source_text";

pub fn insert_report(conn: &Connection, report: &StoredReport) -> Result<(), DatabaseError> {
    let obs = &report.observation;
    conn.execute(
        "INSERT INTO reports (id, username, created_at, report_date, test_name, value, unit,
         reference_range, status, lab_name, doctor_name, original_file, source_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            report.id.to_string(),
            report.username,
            format_timestamp(&report.created_at),
            obs.date.to_string(),
            obs.test_name,
            obs.value,
            obs.unit,
            obs.reference_range,
            obs.status.as_str(),
            obs.lab_name,
            obs.doctor_name,
            obs.original_file,
            obs.source_text,
        ],
    )
    .map_err(constraint_or_sqlite)?;
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Option<StoredReport>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
            params![id.to_string()],
            report_row_from_rusqlite,
        )
        .optional()?;
    row.map(report_from_row).transpose()
}

/// A user's reports in the order they were accepted.
pub fn list_reports(conn: &Connection, username: &str) -> Result<Vec<StoredReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM reports WHERE username = ?1
         ORDER BY created_at ASC, rowid ASC"
    ))?;

    let rows = stmt.query_map(params![username], report_row_from_rusqlite)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row?)?);
    }
    Ok(reports)
}

pub fn count_reports(conn: &Connection, username: &str) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM reports WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Fixed-width UTC timestamps sort the same as text and as instants.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

// Internal row type for StoredReport mapping
struct ReportRow {
    id: String,
    username: String,
    created_at: String,
    report_date: String,
    test_name: String,
    value: String,
    unit: String,
    reference_range: String,
    status: String,
    lab_name: String,
    doctor_name: String,
    original_file: String,
    source_text: String,
}

fn report_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<ReportRow, rusqlite::Error> {
    Ok(ReportRow {
        id: row.get(0)?,
        username: row.get(1)?,
        created_at: row.get(2)?,
        report_date: row.get(3)?,
        test_name: row.get(4)?,
        value: row.get(5)?,
        unit: row.get(6)?,
        reference_range: row.get(7)?,
        status: row.get(8)?,
        lab_name: row.get(9)?,
        doctor_name: row.get(10)?,
        original_file: row.get(11)?,
        source_text: row.get(12)?,
    })
}

fn report_from_row(row: ReportRow) -> Result<StoredReport, DatabaseError> {
    Ok(StoredReport {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        username: row.username,
        created_at: DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| DatabaseError::ConstraintViolation(format!("created_at: {e}")))?
            .with_timezone(&Utc),
        observation: ExtractedObservation {
            date: NaiveDate::parse_from_str(&row.report_date, "%Y-%m-%d")
                .map_err(|e| DatabaseError::ConstraintViolation(format!("report_date: {e}")))?,
            test_name: row.test_name,
            value: row.value,
            unit: row.unit,
            reference_range: row.reference_range,
            status: StatusTier::from_str(&row.status)?,
            lab_name: row.lab_name,
            doctor_name: row.doctor_name,
            original_file: row.original_file,
            source_text: row.source_text,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::db::repository::insert_profile;
    use crate::db::sqlite::open_memory_database;
    use crate::models::UserProfile;

    fn setup() -> Connection {
        let conn = open_memory_database().unwrap();
        for username in ["jane", "sam"] {
            insert_profile(
                &conn,
                &UserProfile {
                    username: username.into(),
                    patient_name: "Test Patient".into(),
                    date_of_birth: None,
                    patient_id: "PAT-2025-001".into(),
                },
            )
            .unwrap();
        }
        conn
    }

    fn report(username: &str, test_name: &str, created_at: DateTime<Utc>) -> StoredReport {
        StoredReport {
            id: Uuid::new_v4(),
            username: username.into(),
            created_at,
            observation: ExtractedObservation {
                date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
                test_name: test_name.into(),
                value: "14.2".into(),
                unit: "g/dL".into(),
                reference_range: "12-16 g/dL".into(),
                status: StatusTier::Normal,
                lab_name: "Northside".into(),
                doctor_name: "Dr. Quinn".into(),
                original_file: "scan.png".into(),
                source_text: "Hemoglobin: 14.2 g/dL".into(),
            },
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 3, 10, 0, 0).unwrap() + Duration::nanoseconds(123_456_789)
    }

    #[test]
    fn insert_and_get_round_trips() {
        let conn = setup();
        let r = report("jane", "Hemoglobin", t0());
        insert_report(&conn, &r).unwrap();
        assert_eq!(get_report(&conn, &r.id).unwrap(), Some(r));
    }

    #[test]
    fn missing_report_is_none() {
        let conn = setup();
        assert_eq!(get_report(&conn, &Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn list_is_scoped_and_in_acceptance_order() {
        let conn = setup();
        let later = report("jane", "TSH", t0() + Duration::seconds(5));
        let earlier = report("jane", "Glucose", t0());
        let other = report("sam", "Cholesterol", t0());
        insert_report(&conn, &later).unwrap();
        insert_report(&conn, &earlier).unwrap();
        insert_report(&conn, &other).unwrap();

        let names: Vec<_> = list_reports(&conn, "jane")
            .unwrap()
            .into_iter()
            .map(|r| r.observation.test_name)
            .collect();
        assert_eq!(names, ["Glucose", "TSH"]);
        assert_eq!(count_reports(&conn, "jane").unwrap(), 2);
        assert_eq!(count_reports(&conn, "sam").unwrap(), 1);
        assert_eq!(count_reports(&conn, "nobody").unwrap(), 0);
    }

    #[test]
    fn same_timestamp_keeps_insert_order() {
        let conn = setup();
        for name in ["A", "B", "C"] {
            insert_report(&conn, &report("jane", name, t0())).unwrap();
        }
        let names: Vec<_> = list_reports(&conn, "jane")
            .unwrap()
            .into_iter()
            .map(|r| r.observation.test_name)
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn unknown_user_is_constraint_violation() {
        let conn = setup();
        let err = insert_report(&conn, &report("ghost", "TSH", t0())).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn corrupted_status_is_invalid_enum() {
        let conn = setup();
        let r = report("jane", "TSH", t0());
        insert_report(&conn, &r).unwrap();
        conn.execute_batch("PRAGMA ignore_check_constraints = ON;").unwrap();
        conn.execute("UPDATE reports SET status = 'weird'", []).unwrap();
        let err = get_report(&conn, &r.id).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidEnum { .. }));
    }
}
