//! User profile registration.
//!
//! Profiles identify whose report list an observation joins. Credentials are
//! not stored.

use chrono::{Datelike, Local};
use rand::Rng;
use rusqlite::Connection;
use thiserror::Error;

use crate::db::repository::{get_profile, insert_profile, profile_exists};
use crate::db::DatabaseError;
use crate::models::UserProfile;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Username is required")]
    MissingUsername,

    #[error("Patient name is required")]
    MissingPatientName,

    #[error("Profile already exists: {0}")]
    AlreadyExists(String),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Registration form. Blank optional fields count as absent.
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub username: String,
    pub patient_name: String,
    pub date_of_birth: Option<String>,
    pub patient_id: Option<String>,
}

pub fn register_profile(conn: &Connection, form: NewProfile) -> Result<UserProfile, ProfileError> {
    let username = form.username.trim();
    if username.is_empty() {
        return Err(ProfileError::MissingUsername);
    }
    let patient_name = form.patient_name.trim();
    if patient_name.is_empty() {
        return Err(ProfileError::MissingPatientName);
    }
    if profile_exists(conn, username)? {
        return Err(ProfileError::AlreadyExists(username.to_string()));
    }

    let profile = UserProfile {
        username: username.to_string(),
        patient_name: patient_name.to_string(),
        date_of_birth: non_blank(form.date_of_birth),
        patient_id: non_blank(form.patient_id)
            .unwrap_or_else(|| generate_patient_id(Local::now().year(), &mut rand::thread_rng())),
    };

    insert_profile(conn, &profile).map_err(|e| match e {
        DatabaseError::ConstraintViolation(_) => ProfileError::AlreadyExists(profile.username.clone()),
        other => ProfileError::Database(other),
    })?;

    tracing::info!(username = %profile.username, patient_id = %profile.patient_id, "Profile registered");
    Ok(profile)
}

pub fn load_profile(conn: &Connection, username: &str) -> Result<UserProfile, ProfileError> {
    get_profile(conn, username)?.ok_or_else(|| ProfileError::NotFound(username.to_string()))
}

/// `PAT-<year>-<NNN>`, NNN a zero-padded random number below 1000.
pub fn generate_patient_id<R: Rng>(year: i32, rng: &mut R) -> String {
    format!("PAT-{year}-{:03}", rng.gen_range(0..1000))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn form(username: &str, patient_name: &str) -> NewProfile {
        NewProfile {
            username: username.into(),
            patient_name: patient_name.into(),
            ..NewProfile::default()
        }
    }

    #[test]
    fn register_generates_patient_id() {
        let conn = open_memory_database().unwrap();
        let profile = register_profile(&conn, form("jane", "Jane Roe")).unwrap();
        let prefix = format!("PAT-{}-", Local::now().year());
        assert!(profile.patient_id.starts_with(&prefix), "{}", profile.patient_id);
        assert_eq!(profile.patient_id.len(), prefix.len() + 3);
        assert_eq!(load_profile(&conn, "jane").unwrap(), profile);
    }

    #[test]
    fn register_keeps_given_fields() {
        let conn = open_memory_database().unwrap();
        let profile = register_profile(
            &conn,
            NewProfile {
                username: "  sam ".into(),
                patient_name: "Sam Poe".into(),
                date_of_birth: Some("15-08-1985".into()),
                patient_id: Some("HOSP-77".into()),
            },
        )
        .unwrap();
        assert_eq!(profile.username, "sam");
        assert_eq!(profile.date_of_birth.as_deref(), Some("15-08-1985"));
        assert_eq!(profile.patient_id, "HOSP-77");
    }

    #[test]
    fn blank_optional_fields_are_absent() {
        let conn = open_memory_database().unwrap();
        let profile = register_profile(
            &conn,
            NewProfile {
                date_of_birth: Some("  ".into()),
                patient_id: Some(String::new()),
                ..form("kim", "Kim Lee")
            },
        )
        .unwrap();
        assert_eq!(profile.date_of_birth, None);
        assert!(profile.patient_id.starts_with("PAT-"));
    }

    #[test]
    fn required_fields_validated() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(
            register_profile(&conn, form(" ", "Jane Roe")),
            Err(ProfileError::MissingUsername)
        ));
        assert!(matches!(
            register_profile(&conn, form("jane", "")),
            Err(ProfileError::MissingPatientName)
        ));
    }

    #[test]
    fn duplicate_username_rejected() {
        let conn = open_memory_database().unwrap();
        register_profile(&conn, form("jane", "Jane Roe")).unwrap();
        assert!(matches!(
            register_profile(&conn, form("jane", "Other")),
            Err(ProfileError::AlreadyExists(_))
        ));
    }

    #[test]
    fn missing_profile_not_found() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(load_profile(&conn, "ghost"), Err(ProfileError::NotFound(_))));
    }

    #[test]
    fn patient_id_is_zero_padded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let id = generate_patient_id(2025, &mut rng);
            let (prefix, number) = id.split_at("PAT-2025-".len());
            assert_eq!(prefix, "PAT-2025-");
            assert_eq!(number.len(), 3);
            assert!(number.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
