use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::InternshipStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub id: i64,
    pub student_id: i64,
    pub company_name: String,
    pub role: String,
    pub description: Option<String>,
    /// YYYY-MM-DD
    pub start_date: String,
    pub end_date: Option<String>,
    pub status: InternshipStatus,
    pub stipend: Option<f64>,
    pub location: Option<String>,
    pub offer_letter_path: Option<String>,
    pub noc_path: Option<String>,
    pub completion_certificate_path: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
