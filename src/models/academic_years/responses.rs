use serde::Serialize;

use super::entities::AcademicYear;
use crate::models::colleges::entities::College;
use crate::models::semesters::entities::Semester;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearDetail {
    #[serde(flatten)]
    pub academic_year: AcademicYear,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<College>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semesters: Option<Vec<Semester>>,
}
