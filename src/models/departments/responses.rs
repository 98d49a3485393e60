use serde::Serialize;

use super::entities::Department;
use crate::models::colleges::entities::College;

// include=relations 时附带所属学院
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDetail {
    #[serde(flatten)]
    pub department: Department,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<College>,
}
