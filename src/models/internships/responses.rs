use serde::Serialize;

use super::entities::Internship;
use crate::models::common::enums::InternshipStatus;

/// 列表中附带的学生信息
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipStudent {
    pub id: i64,
    pub full_name: String,
    pub enrollment_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipListItem {
    #[serde(flatten)]
    pub internship: Internship,
    pub student: InternshipStudent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: InternshipStatus,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// YYYY-MM
    pub month: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipStatistics {
    pub total_internships: u64,
    pub status_breakdown: Vec<StatusCount>,
    pub monthly_trends: Vec<MonthlyCount>,
}
