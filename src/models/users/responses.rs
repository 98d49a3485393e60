use serde::Serialize;

use super::entities::User;
use crate::models::faculty::entities::Faculty;
use crate::models::students::entities::Student;

// 当前登录用户及其档案
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty: Option<Faculty>,
}
