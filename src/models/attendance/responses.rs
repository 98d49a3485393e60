use serde::Serialize;

use super::entities::Attendance;
use crate::models::common::enums::LectureType;

// 考勤记录附带学生信息
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub student_name: String,
    pub enrollment_number: String,
}

// 学生在某门课的出勤汇总
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub course_id: i64,
    pub subject_name: String,
    pub subject_code: String,
    pub faculty_name: String,
    pub lecture_type: LectureType,
    pub batch: Option<String>,
    pub present_count: u64,
    pub absent_count: u64,
    pub total_lectures: u64,
    pub percentage: f64,
}

impl AttendanceSummary {
    /// present / (present + absent) * 100，保留两位小数；病假不计入
    pub fn percentage_of(present: u64, absent: u64) -> f64 {
        let total = present + absent;
        if total == 0 {
            return 0.0;
        }
        let raw = present as f64 / total as f64 * 100.0;
        (raw * 100.0).round() / 100.0
    }
}
