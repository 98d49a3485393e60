use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::LectureType;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub subject_id: i64,
    pub faculty_id: i64,
    pub semester_id: i64,
    pub division_id: i64,
    pub lecture_type: LectureType,
    /// 仅实验课有批次
    pub batch: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
