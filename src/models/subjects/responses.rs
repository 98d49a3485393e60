use serde::Serialize;

use super::entities::Subject;
use crate::models::departments::entities::Department;
use crate::models::semesters::entities::Semester;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDetail {
    #[serde(flatten)]
    pub subject: Subject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
}
