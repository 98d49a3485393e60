use serde::Serialize;

use super::entities::Exam;
use crate::models::semesters::entities::Semester;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDetail {
    #[serde(flatten)]
    pub exam: Exam,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
}
