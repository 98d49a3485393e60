use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::ResultStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: i64,
    pub exam_id: i64,
    /// 学生档案删除后置空，成绩按学号保留
    pub student_id: Option<i64>,
    pub student_enrollment_number: String,
    pub spi: f64,
    pub cpi: f64,
    pub status: ResultStatus,
    pub subject_results: Vec<SubjectResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 单科成绩
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResult {
    pub id: i64,
    pub subject_id: i64,
    pub grade: String,
    pub credits: i32,
}
