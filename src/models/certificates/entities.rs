use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub issuing_organization: String,
    /// YYYY-MM-DD
    pub issue_date: String,
    pub description: Option<String>,
    pub certificate_path: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
