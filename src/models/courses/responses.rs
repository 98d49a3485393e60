use serde::Serialize;

use super::entities::Course;

// 课程及其科目、教师名称
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOverview {
    #[serde(flatten)]
    pub course: Course,
    pub subject_name: String,
    pub subject_code: String,
    pub faculty_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResult {
    pub course_id: i64,
    /// 新增的选课数（已选的不重复计入）
    pub enrolled_count: u64,
}
