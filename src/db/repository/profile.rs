use rusqlite::{params, Connection, OptionalExtension};

use super::constraint_or_sqlite;
use crate::db::DatabaseError;
use crate::models::UserProfile;

pub fn insert_profile(conn: &Connection, profile: &UserProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO profiles (username, patient_name, date_of_birth, patient_id)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            profile.username,
            profile.patient_name,
            profile.date_of_birth,
            profile.patient_id,
        ],
    )
    .map_err(constraint_or_sqlite)?;
    Ok(())
}

pub fn get_profile(conn: &Connection, username: &str) -> Result<Option<UserProfile>, DatabaseError> {
    let profile = conn
        .query_row(
            "SELECT username, patient_name, date_of_birth, patient_id
             FROM profiles WHERE username = ?1",
            params![username],
            |row| {
                Ok(UserProfile {
                    username: row.get(0)?,
                    patient_name: row.get(1)?,
                    date_of_birth: row.get(2)?,
                    patient_id: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(profile)
}

pub fn profile_exists(conn: &Connection, username: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM profiles WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
