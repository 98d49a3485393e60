use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::ExamType;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: i64,
    pub name: String,
    pub exam_type: ExamType,
    pub semester_id: i64,
    pub description: Option<String>,
    pub max_marks: Option<f64>,
    pub passing_marks: Option<f64>,
    pub exam_date: Option<DateTime<Utc>>,
    /// 分钟
    pub duration: Option<i32>,
    pub is_published: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
