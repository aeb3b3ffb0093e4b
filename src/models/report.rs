use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::observation::ExtractedObservation;

/// An observation after the application has accepted it into a user's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub observation: ExtractedObservation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub patient_name: String,
    pub date_of_birth: Option<String>,
    pub patient_id: String,
}
